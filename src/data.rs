use crate::error::ShowcaseResult;
use sqlx::PgConnection;

pub mod department;
pub mod photo;
pub mod student;

#[allow(async_fn_in_trait)]
pub trait DataType: Sized {
    type Id;
    type FormForAdding;

    async fn get_from_db_by_id(id: Self::Id, conn: &mut PgConnection)
    -> ShowcaseResult<Option<Self>>;
    async fn get_all(conn: &mut PgConnection) -> ShowcaseResult<Vec<Self>>;
    async fn insert_into_database(
        to_be_added: Self::FormForAdding,
        conn: &mut PgConnection,
    ) -> ShowcaseResult<Self::Id>;
    async fn remove_from_database(id: Self::Id, conn: &mut PgConnection) -> ShowcaseResult<()>;
}
