// Table endpoints (`/rest/v1/{table}`).

use tracing::debug;

use super::RestGateway;
use crate::error::Error;
use crate::query::{Filter, Select};
use crate::row::Row;

impl RestGateway {
    pub(super) async fn select_rows(&self, query: &Select) -> Result<Vec<Row>, Error> {
        let url = self.rest_url(&query.table)?;
        debug!("GET {url} ({})", query.columns());

        let resp = self
            .authorized(self.http.get(url))
            .query(&query.to_query_pairs())
            .send()
            .await?;
        Self::handle_response(resp).await
    }

    pub(super) async fn insert_rows(&self, table: &str, rows: &[Row]) -> Result<Vec<Row>, Error> {
        let url = self.rest_url(table)?;
        debug!("POST {url} ({} rows)", rows.len());

        let resp = self
            .authorized(self.http.post(url))
            .header("Prefer", "return=representation")
            .json(rows)
            .send()
            .await?;
        Self::handle_response(resp).await
    }

    pub(super) async fn update_rows(
        &self,
        table: &str,
        patch: &Row,
        filters: &[Filter],
    ) -> Result<(), Error> {
        let url = self.rest_url(table)?;
        debug!("PATCH {url}");

        let pairs: Vec<_> = filters.iter().map(Filter::to_query_pair).collect();
        let resp = self
            .authorized(self.http.patch(url))
            .query(&pairs)
            .header("Prefer", "return=minimal")
            .json(patch)
            .send()
            .await?;
        Self::handle_empty(resp).await
    }

    pub(super) async fn delete_rows(&self, table: &str, filters: &[Filter]) -> Result<(), Error> {
        let url = self.rest_url(table)?;
        debug!("DELETE {url}");

        let pairs: Vec<_> = filters.iter().map(Filter::to_query_pair).collect();
        let resp = self
            .authorized(self.http.delete(url))
            .query(&pairs)
            .send()
            .await?;
        Self::handle_empty(resp).await
    }
}
