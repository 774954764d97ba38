//! Two-phase read of `information_schema`.

use std::time::Duration;

use askdb_configuration::ConnectionUri;
use sqlx::postgres::PgConnection;
use sqlx::{Connection, Row};
use tracing::{info_span, Instrument};

use crate::error::IntrospectionError;
use crate::schema::{ColumnInfo, SchemaDescription, TableInfo};

// Tables must be enumerated before columns: the column query is scoped per
// table. Order is left to the catalog; nothing here injects an ORDER BY.
const TABLES_QUERY: &str = "SELECT table_name FROM information_schema.tables \
     WHERE table_schema = 'public' AND table_type = 'BASE TABLE'";

const COLUMNS_QUERY: &str = "SELECT column_name, data_type \
     FROM information_schema.columns WHERE table_name = $1";

/// Describe every base table in the public schema, on a dedicated
/// connection that is closed before returning.
pub async fn introspect_schema(
    connection_uri: &ConnectionUri,
    timeout: Duration,
) -> Result<SchemaDescription, IntrospectionError> {
    tokio::time::timeout(timeout, read_catalog(connection_uri))
        .instrument(info_span!("introspect_schema"))
        .await
        .map_err(|_| IntrospectionError::Timeout(timeout))?
}

async fn read_catalog(
    connection_uri: &ConnectionUri,
) -> Result<SchemaDescription, IntrospectionError> {
    let mut connection = PgConnection::connect(connection_uri.as_str())
        .await
        .map_err(IntrospectionError::Connect)?;

    let table_rows = sqlx::query(TABLES_QUERY)
        .fetch_all(&mut connection)
        .await
        .map_err(IntrospectionError::Catalog)?;

    let mut tables = Vec::with_capacity(table_rows.len());
    for table_row in &table_rows {
        let table_name: String = table_row
            .try_get("table_name")
            .map_err(IntrospectionError::Catalog)?;

        let column_rows = sqlx::query(COLUMNS_QUERY)
            .bind(&table_name)
            .fetch_all(&mut connection)
            .await
            .map_err(IntrospectionError::Catalog)?;

        let mut columns = Vec::with_capacity(column_rows.len());
        for column_row in &column_rows {
            columns.push(ColumnInfo {
                name: column_row
                    .try_get("column_name")
                    .map_err(IntrospectionError::Catalog)?,
                data_type: column_row
                    .try_get("data_type")
                    .map_err(IntrospectionError::Catalog)?,
            });
        }

        tables.push(TableInfo {
            name: table_name,
            columns,
        });
    }

    connection
        .close()
        .await
        .map_err(IntrospectionError::Connect)?;

    tracing::debug!(table_count = tables.len(), "introspected schema");

    Ok(SchemaDescription { tables })
}
