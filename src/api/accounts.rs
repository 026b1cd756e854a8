//! Sign-in, registration and account administration.

use reqwest::Method;

use super::{ApiClient, ApiError, Session, NO_QUERY};
use crate::domain::aggregates::{Account, AuthToken, EmployeeForm, LoginForm, NewAccount};
use crate::domain::value_objects::{PageRequest, Paged};
use crate::Id;

impl ApiClient {
    pub async fn login(&self, form: &LoginForm) -> Result<AuthToken, ApiError> {
        self.send_json(Method::POST, "/Accounts/Login", form, None).await
    }

    pub async fn register(&self, account: &NewAccount) -> Result<Account, ApiError> {
        self.send_json(Method::POST, "/Accounts/Register", account, None).await
    }
}

impl Session<'_> {
    pub async fn me(&self) -> Result<Account, ApiError> {
        self.api.get_json("/Accounts/Me", NO_QUERY, Some(self.token)).await
    }

    pub async fn customers(&self, page: PageRequest) -> Result<Paged<Account>, ApiError> {
        self.api.get_json("/Accounts/Customers", &page, Some(self.token)).await
    }

    pub async fn employees(&self) -> Result<Vec<Account>, ApiError> {
        self.api.get_json("/Accounts/Employees", NO_QUERY, Some(self.token)).await
    }

    pub async fn create_employee(&self, form: &EmployeeForm) -> Result<Account, ApiError> {
        self.api.send_json(Method::POST, "/Accounts/Employees", form, Some(self.token)).await
    }

    pub async fn update_employee(&self, id: Id, form: &EmployeeForm) -> Result<Account, ApiError> {
        self.api.send_json(Method::PUT, &format!("/Accounts/Employees/{id}"), form, Some(self.token)).await
    }

    pub async fn delete_employee(&self, id: Id) -> Result<(), ApiError> {
        self.api.delete(&format!("/Accounts/Employees/{id}"), Some(self.token)).await
    }
}
