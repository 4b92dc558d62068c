//! `/reminders*` endpoints.

use tally_core::Result;
use tally_core::model::{Reminder, ReminderCreate, ReminderUpdate};

use crate::client::ApiClient;
use crate::options::RequestOptions;

pub const REMINDERS: &str = "/reminders";

pub async fn list(client: &ApiClient) -> Result<Vec<Reminder>> {
    client
        .get(REMINDERS, RequestOptions::default())
        .await?
        .data()
}

pub async fn create(client: &ApiClient, request: &ReminderCreate) -> Result<Reminder> {
    client
        .post(REMINDERS, request, RequestOptions::default())
        .await?
        .data()
}

pub async fn update(
    client: &ApiClient,
    reminder_id: i64,
    request: &ReminderUpdate,
) -> Result<Reminder> {
    client
        .put(
            &format!("{REMINDERS}/{reminder_id}"),
            request,
            RequestOptions::default(),
        )
        .await?
        .data()
}

pub async fn delete(client: &ApiClient, reminder_id: i64) -> Result<()> {
    client
        .delete(&format!("{REMINDERS}/{reminder_id}"), RequestOptions::default())
        .await
        .map(|_| ())
}
