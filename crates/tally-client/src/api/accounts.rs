//! `/accounts*` endpoints.

use tally_core::Result;
use tally_core::model::{Account, AccountCreate, AccountUpdate, TransferRequest};

use crate::client::ApiClient;
use crate::options::RequestOptions;

pub const ACCOUNTS: &str = "/accounts";
pub const TRANSFER: &str = "/accounts/transfer";

pub async fn list(client: &ApiClient) -> Result<Vec<Account>> {
    client
        .get(ACCOUNTS, RequestOptions::default())
        .await?
        .data()
}

pub async fn get(client: &ApiClient, account_id: i64) -> Result<Account> {
    client
        .get(&format!("{ACCOUNTS}/{account_id}"), RequestOptions::default())
        .await?
        .data()
}

pub async fn create(client: &ApiClient, request: &AccountCreate) -> Result<Account> {
    client
        .post(ACCOUNTS, request, RequestOptions::default())
        .await?
        .data()
}

pub async fn update(
    client: &ApiClient,
    account_id: i64,
    request: &AccountUpdate,
) -> Result<Account> {
    client
        .put(
            &format!("{ACCOUNTS}/{account_id}"),
            request,
            RequestOptions::default(),
        )
        .await?
        .data()
}

pub async fn delete(client: &ApiClient, account_id: i64) -> Result<()> {
    client
        .delete(&format!("{ACCOUNTS}/{account_id}"), RequestOptions::default())
        .await
        .map(|_| ())
}

/// Move money between two accounts.
pub async fn transfer(client: &ApiClient, request: &TransferRequest) -> Result<()> {
    client
        .post(TRANSFER, request, RequestOptions::default())
        .await
        .map(|_| ())
}
