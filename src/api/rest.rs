//! Implements `Backend` over the backend's PostgREST interface.

use crate::api::{Backend, DateRange, SessionProvider, User};
use crate::model::{Amount, Category, NewCategory, NewTransaction, Transaction, TransactionKind};
use crate::{Config, Result};
use anyhow::{bail, Context};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, trace};
use url::Url;

const TRANSACTIONS: &str = "transacao";
const CATEGORIES: &str = "categoria";
const TRANSACTION_COLUMNS: &str = "id,descricao,valor,tipo,data,user_id,categoria(nome,cor)";
const CATEGORY_COLUMNS: &str = "id,nome,tipo,cor,icone";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

pub(crate) struct RestBackend {
    rest_url: Url,
    http: reqwest::Client,
    session: SessionProvider,
}

impl RestBackend {
    pub(crate) fn new(config: &Config, session: SessionProvider) -> Result<Self> {
        let rest_url = config
            .backend_url()
            .join("rest/v1/")
            .context("Unable to build the REST URL")?;
        Ok(Self {
            rest_url,
            http: reqwest::Client::new(),
            session,
        })
    }

    fn user_id(&self) -> String {
        self.session.user().id.clone()
    }

    fn table_url(&self, table: &str, query: &[(&str, String)]) -> Result<Url> {
        let mut url = self
            .rest_url
            .join(table)
            .with_context(|| format!("Unable to build the URL for table '{table}'"))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Starts an authenticated request against `table`.
    async fn request(
        &mut self,
        method: Method,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<RequestBuilder> {
        let url = self.table_url(table, query)?;
        let token = self.session.token().await?;
        trace!("{method} {url}");
        Ok(self
            .http
            .request(method, url)
            .header("apikey", self.session.anon_key())
            .bearer_auth(token))
    }

    async fn select<T: DeserializeOwned>(
        &mut self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let request = self.request(Method::GET, table, query).await?;
        send_json(request).await
    }

    /// Inserts `body` into `table` and returns the stored row.
    async fn insert<T: DeserializeOwned>(
        &mut self,
        table: &str,
        columns: &str,
        body: serde_json::Value,
    ) -> Result<T> {
        let request = self
            .request(Method::POST, table, &[("select", columns.to_string())])
            .await?
            .header("Prefer", "return=representation")
            .header("Accept", SINGLE_OBJECT)
            .json(&body);
        send_json(request).await
    }

    async fn delete(&mut self, table: &str, id: &str) -> Result<()> {
        let query = [
            ("id", format!("eq.{id}")),
            ("user_id", format!("eq.{}", self.user_id())),
        ];
        let request = self
            .request(Method::DELETE, table, &query)
            .await?
            .header("Prefer", "return=representation");
        let deleted: Vec<serde_json::Value> = send_json(request).await?;
        if deleted.is_empty() {
            bail!("No row with id '{id}' was found in '{table}'");
        }
        debug!("Deleted '{id}' from '{table}'");
        Ok(())
    }
}

#[async_trait::async_trait]
impl Backend for RestBackend {
    async fn user(&mut self) -> Result<User> {
        Ok(self.session.user().clone())
    }

    async fn fetch_transactions(&mut self, range: &DateRange) -> Result<Vec<Transaction>> {
        let query = [
            ("select", TRANSACTION_COLUMNS.to_string()),
            ("user_id", format!("eq.{}", self.user_id())),
            ("data", format!("gte.{}", range.start().format(TIMESTAMP_FORMAT))),
            ("data", format!("lte.{}", range.end().format(TIMESTAMP_FORMAT))),
            ("order", "data.desc".to_string()),
        ];
        let transactions: Vec<Transaction> = self.select(TRANSACTIONS, &query).await?;
        debug!("Received {} transactions", transactions.len());
        Ok(transactions)
    }

    async fn recent_transactions(&mut self, limit: usize) -> Result<Vec<Transaction>> {
        let query = [
            ("select", TRANSACTION_COLUMNS.to_string()),
            ("user_id", format!("eq.{}", self.user_id())),
            ("order", "data.desc".to_string()),
            ("limit", limit.to_string()),
        ];
        self.select(TRANSACTIONS, &query).await
    }

    async fn amounts(&mut self) -> Result<Vec<(Amount, TransactionKind)>> {
        #[derive(Deserialize)]
        struct Row {
            valor: Amount,
            tipo: String,
        }

        let query = [
            ("select", "valor,tipo".to_string()),
            ("user_id", format!("eq.{}", self.user_id())),
        ];
        let rows: Vec<Row> = self.select(TRANSACTIONS, &query).await?;
        rows.into_iter()
            .map(|row| -> Result<(Amount, TransactionKind)> {
                Ok((row.valor, TransactionKind::from_tag(&row.tipo)?))
            })
            .collect()
    }

    async fn create_transaction(&mut self, new: &NewTransaction) -> Result<Transaction> {
        let mut body = serde_json::to_value(new).context("Unable to serialize the transaction")?;
        if let Some(object) = body.as_object_mut() {
            object.insert("user_id".to_string(), self.user_id().into());
            object.insert("source".to_string(), "manual".into());
        }
        self.insert(TRANSACTIONS, TRANSACTION_COLUMNS, body).await
    }

    async fn delete_transaction(&mut self, id: &str) -> Result<()> {
        self.delete(TRANSACTIONS, id).await
    }

    async fn list_categories(&mut self) -> Result<Vec<Category>> {
        let query = [
            ("select", CATEGORY_COLUMNS.to_string()),
            ("user_id", format!("eq.{}", self.user_id())),
            ("order", "nome.asc".to_string()),
        ];
        self.select(CATEGORIES, &query).await
    }

    async fn create_category(&mut self, new: &NewCategory) -> Result<Category> {
        let mut body = serde_json::to_value(new).context("Unable to serialize the category")?;
        if let Some(object) = body.as_object_mut() {
            object.insert("user_id".to_string(), self.user_id().into());
        }
        self.insert(CATEGORIES, CATEGORY_COLUMNS, body).await
    }

    async fn delete_category(&mut self, id: &str) -> Result<()> {
        self.delete(CATEGORIES, id).await
    }
}

/// Sends the request and parses a JSON body. A non-success status becomes an error carrying the
/// status and the response body.
async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
    let response = request
        .send()
        .await
        .context("Unable to reach the backend")?;
    let status = response.status();
    let text = response
        .text()
        .await
        .context("Unable to read the backend response")?;
    if !status.is_success() {
        bail!("The backend responded with status {status}: {text}");
    }
    serde_json::from_str(&text).context("Unable to parse the backend response")
}
