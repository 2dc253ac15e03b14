use crate::{
    auth::{AuthUtilities, ShowcaseSession},
    config::{DbConfig, RuntimeConfiguration},
    error::{GetDatabaseConnectionSnafu, MigrateSnafu, OpenDatabaseSnafu, ShowcaseResult},
    maud_conveniences::render_nav,
};
use maud::{DOCTYPE, Markup, html};
use snafu::ResultExt;
use sqlx::{Pool, Postgres, pool::PoolConnection, postgres::PgPoolOptions};

#[derive(Clone, Debug)]
pub struct ShowcaseState {
    pool: Pool<Postgres>,
    config: RuntimeConfiguration,
}

///shared by the server and the standalone seeder
pub async fn connect_and_migrate(
    options: PgPoolOptions,
    db_config: &DbConfig,
) -> ShowcaseResult<Pool<Postgres>> {
    let pool = options
        .connect(&db_config.get_db_path())
        .await
        .context(OpenDatabaseSnafu)?;

    sqlx::migrate!().run(&pool).await.context(MigrateSnafu)?;

    Ok(pool)
}

///htmx leaves 4xx/5xx responses out of the page by default, but ours carry the error message
const HTMX_CONFIG: &str = r#"{"responseHandling":[{"code":"204","swap":false},{"code":"[23]..","swap":true},{"code":"[45]..","swap":true,"error":true},{"code":"...","swap":false}]}"#;

pub fn render_page(is_admin: bool, markup: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="UTF-8" {}
                meta name="viewport" content="width=device-width, initial-scale=1.0" {}
                meta name="htmx-config" content=(HTMX_CONFIG) {}
                script src="https://unpkg.com/htmx.org@2.0.4" integrity="sha384-HGfztofotfshcF7+8n44JQL2oJmowVChPTg48S+jvZoztPfvwD79OC/LTtG6dMp+" crossorigin="anonymous" {}
                script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4" {}
                title { "Graduating Class Showcase" }
            }
            body class="bg-gray-900 min-h-screen flex flex-col text-white" {
                (render_nav(is_admin))
                main class="flex-1 w-full" {
                    (markup)
                }
                footer class="py-8 px-4 border-t border-gray-800 text-center text-gray-500" {
                    "Graduating Class Student Showcase"
                }
            }
        }
    }
}

impl ShowcaseState {
    pub async fn new(
        options: PgPoolOptions,
        db_config: &DbConfig,
        config: RuntimeConfiguration,
    ) -> ShowcaseResult<Self> {
        let pool = connect_and_migrate(options, db_config).await?;

        Ok(Self::from_pool(pool, config))
    }

    ///for a pool that's already connected and migrated
    pub const fn from_pool(pool: Pool<Postgres>, config: RuntimeConfiguration) -> Self {
        Self { pool, config }
    }

    pub const fn config(&self) -> &RuntimeConfiguration {
        &self.config
    }

    #[allow(clippy::unused_self)] //in case self is ever needed :)
    pub fn render(&self, session: &ShowcaseSession, markup: Markup) -> Markup {
        render_page(session.is_admin(), markup)
    }

    pub async fn get_connection(&self) -> ShowcaseResult<PoolConnection<Postgres>> {
        self.pool
            .acquire()
            .await
            .context(GetDatabaseConnectionSnafu)
    }

    pub async fn sensible_shutdown(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_responses_get_swapped_in() {
        let rendered = render_page(false, html! { p {"hi"} }).into_string();

        assert!(rendered.contains("<meta name=\"htmx-config\""));
        assert!(rendered.contains("{&quot;code&quot;:&quot;[45]..&quot;,&quot;swap&quot;:true,&quot;error&quot;:true}"));
        assert!(rendered.contains("<p>hi</p>"));
    }

    #[test]
    fn logout_only_shown_to_the_admin() {
        assert!(!render_page(false, Markup::default()).into_string().contains("/admin/logout"));
        assert!(render_page(true, Markup::default()).into_string().contains("/admin/logout"));
    }
}
