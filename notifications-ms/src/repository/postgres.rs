use diesel::connection::SimpleConnection;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::Bool;

use notifications_shared::clients::db::DbPool;
use notifications_shared::errors::AppResult;

use crate::models::{NewNotification, Notification};
use crate::owner::{OwnerMatch, LIKE_ESCAPE};
use crate::repository::NotificationRepository;
use crate::schema::notifications;

const CREATE_NOTIFICATIONS_TABLE: &str =
    include_str!("../../migrations/2024-01-01-000000_create_notifications/up.sql");

type OwnerFilter = Box<dyn BoxableExpression<notifications::table, Pg, SqlType = Bool>>;

/// SQL form of an owner rule. `None` means the rule can match no rows.
fn owner_filter(rule: &OwnerMatch) -> Option<OwnerFilter> {
    match rule {
        OwnerMatch::Exact(owner) => {
            let filter: OwnerFilter = Box::new(notifications::user_auth0_id.eq(owner.clone()));
            Some(filter)
        }
        OwnerMatch::LocalIdSuffix(_) => rule.like_pattern().map(|pattern| {
            let filter: OwnerFilter =
                Box::new(notifications::user_auth0_id.like(pattern).escape(LIKE_ESCAPE));
            filter
        }),
        OwnerMatch::Nothing => None,
    }
}

/// Diesel-backed repository. Every call is one statement on a pooled connection.
#[derive(Clone)]
pub struct PgNotificationRepository {
    pool: DbPool,
}

impl PgNotificationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn connection(
        &self,
    ) -> AppResult<diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<PgConnection>>> {
        self.pool.get().map_err(|e| {
            tracing::error!(error = %e, "failed to get db connection");
            e.into()
        })
    }
}

impl NotificationRepository for PgNotificationRepository {
    fn add_notification(&self, notification: NewNotification) -> AppResult<Notification> {
        let mut conn = self.connection()?;

        let notification = diesel::insert_into(notifications::table)
            .values(&notification)
            .returning(Notification::as_returning())
            .get_result(&mut conn)?;

        Ok(notification)
    }

    fn get_notifications_by_owner(&self, owner_id: &str) -> AppResult<Vec<Notification>> {
        let Some(filter) = owner_filter(&OwnerMatch::for_read(owner_id)) else {
            return Ok(Vec::new());
        };

        let mut conn = self.connection()?;
        let items = notifications::table
            .filter(filter)
            .select(Notification::as_select())
            .load(&mut conn)?;

        Ok(items)
    }

    fn delete_notifications_by_owner(&self, owner_id: &str) -> AppResult<usize> {
        let Some(filter) = owner_filter(&OwnerMatch::for_delete(owner_id)) else {
            tracing::warn!(owner_id = %owner_id, "owner id has no local-id, nothing to delete");
            return Ok(0);
        };

        let mut conn = self.connection()?;
        let deleted = diesel::delete(notifications::table.filter(filter)).execute(&mut conn)?;

        Ok(deleted)
    }
}

/// Create the table and owner index if they are missing.
pub fn ensure_schema(pool: &DbPool) -> AppResult<()> {
    let mut conn = pool.get()?;
    conn.batch_execute(CREATE_NOTIFICATIONS_TABLE)?;

    tracing::info!("notifications schema ready");
    Ok(())
}
