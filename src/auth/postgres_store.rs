use crate::{
    error::{MakeQuerySnafu, RmpSerdeDecodeSnafu, RmpSerdeEncodeSnafu, ShowcaseError},
    state::ShowcaseState,
};
use async_trait::async_trait;
use axum_login::tower_sessions::{
    ExpiredDeletion, SessionStore,
    session::{Id, Record},
    session_store::Error as SSError,
};
use snafu::ResultExt;
use sqlx::{FromRow, PgConnection};
use time::OffsetDateTime;

///Only msgpack failures are encoding or decoding problems, everything else came from the database.
fn store_error(e: ShowcaseError) -> SSError {
    match e {
        ShowcaseError::RmpSerdeEncode { .. } => SSError::Encode(e.to_string()),
        ShowcaseError::RmpSerdeDecode { .. } => SSError::Decode(e.to_string()),
        _ => SSError::Backend(e.to_string()),
    }
}

#[derive(Debug, Clone)]
pub struct PostgresSessionStore {
    state: ShowcaseState,
}

#[derive(FromRow)]
struct SessionRow {
    data: Vec<u8>,
    expiry_date: OffsetDateTime,
}

impl PostgresSessionStore {
    pub const fn new(state: ShowcaseState) -> Self {
        Self { state }
    }

    async fn id_exists(id: Id, conn: &mut PgConnection) -> Result<bool, ShowcaseError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM public.sessions WHERE id = $1)")
            .bind(id.to_string())
            .fetch_one(conn)
            .await
            .context(MakeQuerySnafu)
    }

    async fn save_session(record: &Record, conn: &mut PgConnection) -> Result<(), ShowcaseError> {
        let serialised_data = rmp_serde::to_vec(&record.data).context(RmpSerdeEncodeSnafu)?;

        sqlx::query("INSERT INTO public.sessions (id, data, expiry_date) VALUES ($1, $2, $3) ON CONFLICT (id) DO UPDATE SET data = excluded.data, expiry_date = excluded.expiry_date")
            .bind(record.id.to_string())
            .bind(serialised_data)
            .bind(record.expiry_date)
            .execute(conn)
            .await
            .context(MakeQuerySnafu)?;

        Ok(())
    }

    async fn load_session(id: &Id, conn: &mut PgConnection) -> Result<Option<Record>, ShowcaseError> {
        let Some(SessionRow { data, expiry_date }) = sqlx::query_as::<_, SessionRow>(
            "SELECT data, expiry_date FROM public.sessions WHERE id = $1 AND expiry_date > now()",
        )
        .bind(id.to_string())
        .fetch_optional(conn)
        .await
        .context(MakeQuerySnafu)?
        else {
            return Ok(None);
        };

        let data = rmp_serde::from_slice(&data).context(RmpSerdeDecodeSnafu)?;

        Ok(Some(Record {
            id: *id,
            data,
            expiry_date,
        }))
    }
}

#[async_trait]
impl SessionStore for PostgresSessionStore {
    async fn create(&self, session_record: &mut Record) -> Result<(), SSError> {
        let mut connection = self
            .state
            .get_connection()
            .await
            .map_err(store_error)?;

        while Self::id_exists(session_record.id, &mut connection)
            .await
            .map_err(store_error)?
        {
            session_record.id = Id::default();
        }

        Self::save_session(session_record, &mut connection)
            .await
            .map_err(store_error)?;

        Ok(())
    }

    async fn save(&self, session_record: &Record) -> Result<(), SSError> {
        let mut connection = self
            .state
            .get_connection()
            .await
            .map_err(store_error)?;

        Self::save_session(session_record, &mut connection)
            .await
            .map_err(store_error)?;

        Ok(())
    }

    async fn load(&self, session_id: &Id) -> Result<Option<Record>, SSError> {
        let mut connection = self
            .state
            .get_connection()
            .await
            .map_err(store_error)?;

        Self::load_session(session_id, &mut connection)
            .await
            .map_err(store_error)
    }

    async fn delete(&self, session_id: &Id) -> Result<(), SSError> {
        let mut connection = self
            .state
            .get_connection()
            .await
            .map_err(store_error)?;

        sqlx::query("DELETE FROM public.sessions WHERE id = $1")
            .bind(session_id.to_string())
            .execute(&mut *connection)
            .await
            .context(MakeQuerySnafu)
            .map_err(store_error)?;

        Ok(())
    }
}

#[async_trait]
impl ExpiredDeletion for PostgresSessionStore {
    async fn delete_expired(&self) -> Result<(), SSError> {
        let mut connection = self
            .state
            .get_connection()
            .await
            .map_err(store_error)?;

        let deleted = sqlx::query("DELETE FROM public.sessions WHERE expiry_date < now()")
            .execute(&mut *connection)
            .await
            .context(MakeQuerySnafu)
            .map_err(store_error)?
            .rows_affected();
        info!(deleted, "Removed expired sessions");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_failures_are_backend_errors() {
        let err = store_error(ShowcaseError::MakeQuery {
            source: sqlx::Error::PoolTimedOut,
        });
        assert!(matches!(err, SSError::Backend(_)));

        let err = store_error(ShowcaseError::GetDatabaseConnection {
            source: sqlx::Error::PoolClosed,
        });
        assert!(matches!(err, SSError::Backend(_)));
    }

    #[test]
    fn msgpack_failures_keep_their_kind() {
        let decode = rmp_serde::from_slice::<String>(&[0xc1]).unwrap_err();
        assert!(matches!(
            store_error(ShowcaseError::RmpSerdeDecode { source: decode }),
            SSError::Decode(_)
        ));

        let encode = rmp_serde::encode::Error::Syntax("unsupported".into());
        assert!(matches!(
            store_error(ShowcaseError::RmpSerdeEncode { source: encode }),
            SSError::Encode(_)
        ));
    }
}
