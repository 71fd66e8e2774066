//! Employees, HR profiles and departments.

use ems_types::{
    Portal,
    department::{Department, DepartmentUpdate, NewDepartment},
    employee::{Employee, EmployeeChanges, EmployeeRef, ProfileChanges, UpdateEmployee},
    hr::{HrProfile, HrProfileChanges, NewHrProfile, PasswordChange, PermissionUpdate},
};
use uuid::Uuid;

use crate::{client::ApiClient, endpoints, error::ClientResult};

pub struct Employees<'a> {
    client: &'a ApiClient,
}

pub struct HrProfiles<'a> {
    client: &'a ApiClient,
}

pub struct Departments<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn employees(&self) -> Employees<'_> {
        Employees { client: self }
    }

    pub fn hr_profiles(&self) -> HrProfiles<'_> {
        HrProfiles { client: self }
    }

    pub fn departments(&self) -> Departments<'_> {
        Departments { client: self }
    }
}

impl Employees<'_> {
    pub async fn list(&self) -> ClientResult<Vec<Employee>> {
        self.client.get(Portal::Hr, endpoints::employee::ALL).await
    }

    pub async fn ids(&self) -> ClientResult<Vec<EmployeeRef>> {
        self.client.get(Portal::Hr, endpoints::employee::ALL_IDS).await
    }

    pub async fn get(&self, id: Uuid) -> ClientResult<Employee> {
        self.client.get(Portal::Hr, &endpoints::employee::by_hr(id)).await
    }

    pub async fn update(&self, id: Uuid, changes: EmployeeChanges) -> ClientResult<Employee> {
        let body = UpdateEmployee {
            employee_id: id,
            updated_employee: changes,
        };
        self.client
            .patch(Portal::Hr, endpoints::employee::UPDATE, &body)
            .await
    }

    pub async fn delete(&self, id: Uuid) -> ClientResult<String> {
        self.client
            .delete(Portal::Hr, &endpoints::employee::delete(id))
            .await
    }

    /// The logged-in employee's own record.
    pub async fn me(&self) -> ClientResult<Employee> {
        self.client
            .get(Portal::Employee, endpoints::employee::BY_EMPLOYEE)
            .await
    }

    pub async fn update_me(&self, changes: &ProfileChanges) -> ClientResult<Employee> {
        self.client
            .patch(Portal::Employee, endpoints::employee::UPDATE_PROFILE, changes)
            .await
    }
}

impl HrProfiles<'_> {
    pub async fn list(&self) -> ClientResult<Vec<HrProfile>> {
        self.client.get(Portal::Hr, endpoints::hr::ALL).await
    }

    pub async fn create(&self, body: &NewHrProfile) -> ClientResult<HrProfile> {
        self.client.post(Portal::Hr, endpoints::hr::CREATE, body).await
    }

    pub async fn get(&self, id: Uuid) -> ClientResult<HrProfile> {
        self.client.get(Portal::Hr, &endpoints::hr::profile(id)).await
    }

    pub async fn update(&self, id: Uuid, changes: &HrProfileChanges) -> ClientResult<HrProfile> {
        self.client
            .patch(Portal::Hr, &endpoints::hr::update(id), changes)
            .await
    }

    pub async fn delete(&self, id: Uuid) -> ClientResult<String> {
        self.client.delete(Portal::Hr, &endpoints::hr::delete(id)).await
    }

    pub async fn update_permissions(&self, id: Uuid, body: &PermissionUpdate) -> ClientResult<HrProfile> {
        self.client
            .patch(Portal::Hr, &endpoints::hr::permissions(id), body)
            .await
    }

    pub async fn change_password(&self, id: Uuid, body: &PasswordChange) -> ClientResult<String> {
        self.client
            .patch_for_message(Portal::Hr, &endpoints::hr::change_password(id), body)
            .await
    }
}

impl Departments<'_> {
    pub async fn list(&self) -> ClientResult<Vec<Department>> {
        self.client.get(Portal::Hr, endpoints::department::ALL).await
    }

    pub async fn create(&self, body: &NewDepartment) -> ClientResult<Department> {
        self.client
            .post(Portal::Hr, endpoints::department::CREATE, body)
            .await
    }

    pub async fn update(&self, body: &DepartmentUpdate) -> ClientResult<Department> {
        self.client
            .patch(Portal::Hr, endpoints::department::UPDATE, body)
            .await
    }

    pub async fn delete(&self, id: Uuid) -> ClientResult<String> {
        self.client
            .delete(Portal::Hr, &endpoints::department::delete(id))
            .await
    }
}
