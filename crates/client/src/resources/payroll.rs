use chrono::NaiveDate;
use ems_types::{
    Portal,
    balance::{Balance, BalanceUpdate, NewBalance},
    salary::{
        AutoPayrollReport, AutoPayrollRequest, NewSalary, PayrollCalculation,
        PayrollCalculationRequest, PayrollSettings, Salary, SalaryUpdate,
    },
};
use uuid::Uuid;

use crate::{client::ApiClient, endpoints, error::ClientResult};

pub struct Salaries<'a> {
    client: &'a ApiClient,
}

/// Monthly expense balances of the organization.
pub struct Balances<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn salaries(&self) -> Salaries<'_> {
        Salaries { client: self }
    }

    pub fn balances(&self) -> Balances<'_> {
        Balances { client: self }
    }
}

impl Balances<'_> {
    pub async fn list(&self) -> ClientResult<Vec<Balance>> {
        self.client.get(Portal::Hr, endpoints::balance::ALL).await
    }

    pub async fn get(&self, id: Uuid) -> ClientResult<Balance> {
        self.client.get(Portal::Hr, &endpoints::balance::one(id)).await
    }

    pub async fn create(&self, body: &NewBalance) -> ClientResult<Balance> {
        self.client.post(Portal::Hr, endpoints::balance::CREATE, body).await
    }

    pub async fn update(&self, body: &BalanceUpdate) -> ClientResult<Balance> {
        self.client.patch(Portal::Hr, endpoints::balance::UPDATE, body).await
    }

    pub async fn delete(&self, id: Uuid) -> ClientResult<String> {
        self.client.delete(Portal::Hr, &endpoints::balance::delete(id)).await
    }
}

impl Salaries<'_> {
    pub async fn create(&self, body: &NewSalary) -> ClientResult<Salary> {
        self.client.post(Portal::Hr, endpoints::salary::CREATE, body).await
    }

    pub async fn list(&self) -> ClientResult<Vec<Salary>> {
        self.client.get(Portal::Hr, endpoints::salary::ALL).await
    }

    pub async fn get(&self, id: Uuid) -> ClientResult<Salary> {
        self.client.get(Portal::Hr, &endpoints::salary::one(id)).await
    }

    pub async fn update(&self, body: &SalaryUpdate) -> ClientResult<Salary> {
        self.client.patch(Portal::Hr, endpoints::salary::UPDATE, body).await
    }

    pub async fn delete(&self, id: Uuid) -> ClientResult<String> {
        self.client.delete(Portal::Hr, &endpoints::salary::delete(id)).await
    }

    pub async fn mine(&self) -> ClientResult<Vec<Salary>> {
        self.client.get(Portal::Employee, endpoints::salary::MINE).await
    }

    pub async fn settings(&self) -> ClientResult<PayrollSettings> {
        self.client.get(Portal::Hr, endpoints::salary::SETTINGS).await
    }

    pub async fn save_settings(&self, settings: &PayrollSettings) -> ClientResult<PayrollSettings> {
        self.client
            .put(Portal::Hr, endpoints::salary::SETTINGS, settings)
            .await
    }

    /// Payroll for one employee from attendance; saved when `request.save`.
    pub async fn calculate(&self, request: &PayrollCalculationRequest) -> ClientResult<PayrollCalculation> {
        self.client
            .post(Portal::Hr, endpoints::salary::CALCULATE, request)
            .await
    }

    pub async fn auto_payroll(&self, period_end: Option<NaiveDate>) -> ClientResult<AutoPayrollReport> {
        let body = AutoPayrollRequest { period_end };
        self.client
            .post(Portal::Hr, endpoints::salary::AUTO_PAYROLL, &body)
            .await
    }
}
