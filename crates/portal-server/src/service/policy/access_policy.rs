//! Dashboard visibility and access decisions.

use portal_postgres::model::Dashboard;
use portal_postgres::query::{DashboardRepository, GrantRepository};
use portal_postgres::{PgConnection, PgResult};

use super::{Permission, Principal};
use crate::utility::tracing_targets::ACCESS_POLICY as TRACING_TARGET;

/// Outcome of an embed credential access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// The principal may receive a credential.
    Granted,
    /// The dashboard is visible but unpublished.
    DashboardInactive,
    /// The principal's department holds no grant.
    NoGrant,
}

impl AccessDecision {
    /// Returns whether access was granted.
    #[inline]
    pub const fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Dashboard access rules.
pub struct AccessPolicy;

impl AccessPolicy {
    /// Returns whether the dashboard appears in the principal's listings.
    ///
    /// Inactive dashboards stay visible so their alert can be shown.
    pub fn is_visible(principal: &Principal, grant_exists: bool) -> bool {
        principal.can(Permission::ViewAllDashboards) || grant_exists
    }

    /// Decides whether the principal may receive an embed credential.
    pub fn decide(
        principal: &Principal,
        dashboard: &Dashboard,
        grant_exists: bool,
    ) -> AccessDecision {
        if principal.can(Permission::ViewAllDashboards) {
            if dashboard.is_active() || principal.can(Permission::IssueInactiveDashboards) {
                return AccessDecision::Granted;
            }
            return AccessDecision::DashboardInactive;
        }

        if !dashboard.is_active() {
            return AccessDecision::DashboardInactive;
        }

        if !grant_exists {
            return AccessDecision::NoGrant;
        }

        AccessDecision::Granted
    }

    /// Loads the dashboards visible to the principal, identifier descending.
    pub async fn visible_dashboards(
        conn: &mut PgConnection,
        principal: &Principal,
    ) -> PgResult<Vec<Dashboard>> {
        if principal.can(Permission::ViewAllDashboards) {
            return conn.list_dashboards().await;
        }

        conn.list_granted_dashboards(principal.department_id).await
    }

    /// Re-checks access against the current grants.
    ///
    /// The grant lookup always hits the database, so a revoked grant denies
    /// the very next request.
    pub async fn check_access(
        conn: &mut PgConnection,
        principal: &Principal,
        dashboard: &Dashboard,
    ) -> PgResult<AccessDecision> {
        let grant_exists = if principal.can(Permission::ViewAllDashboards) {
            false
        } else {
            conn.grant_exists(principal.department_id, dashboard.id)
                .await?
        };

        let decision = Self::decide(principal, dashboard, grant_exists);

        tracing::debug!(
            target: TRACING_TARGET,
            user_id = principal.user_id,
            dashboard_id = dashboard.id,
            role = %principal.role,
            grant_exists,
            decision = ?decision,
            "dashboard access evaluated"
        );

        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use portal_postgres::model::User;
    use portal_postgres::types::{DashboardStatus, UserRole};

    use super::*;

    fn principal(role: UserRole, department_id: i32) -> Principal {
        Principal::from(User {
            id: 1,
            email: "analyst@example.com".into(),
            display_name: "Analyst".into(),
            department_id,
            role,
            created_at: Timestamp::now().into(),
            updated_at: Timestamp::now().into(),
        })
    }

    fn dashboard(id: i32, status: DashboardStatus) -> Dashboard {
        let alert = (!status.is_active()).then(|| "Maintenance in progress".to_string());
        Dashboard {
            id,
            name: format!("Dashboard {id}"),
            report_id: "report".into(),
            workspace_id: "workspace".into(),
            core_dataset_id: "dataset".into(),
            proxy_dataset_id: None,
            description: None,
            owner: None,
            status,
            alert,
            created_by: "Admin".into(),
            updated_by: None,
            created_at: Timestamp::now().into(),
            updated_at: None,
        }
    }

    #[test]
    fn privileged_roles_see_everything_without_grants() {
        for role in [UserRole::Admin, UserRole::Superuser] {
            let principal = principal(role, 3);
            assert!(AccessPolicy::is_visible(&principal, false));

            for status in [DashboardStatus::Active, DashboardStatus::Inactive] {
                let dashboard = dashboard(10, status);
                assert_eq!(
                    AccessPolicy::decide(&principal, &dashboard, false),
                    AccessDecision::Granted
                );
            }
        }
    }

    #[test]
    fn users_see_exactly_granted_dashboards() {
        let principal = principal(UserRole::User, 3);
        assert!(AccessPolicy::is_visible(&principal, true));
        assert!(!AccessPolicy::is_visible(&principal, false));
    }

    #[test]
    fn users_cannot_issue_inactive_dashboards_even_with_grant() {
        let principal = principal(UserRole::User, 3);
        let dashboard = dashboard(10, DashboardStatus::Inactive);

        assert!(AccessPolicy::is_visible(&principal, true));
        assert_eq!(
            AccessPolicy::decide(&principal, &dashboard, true),
            AccessDecision::DashboardInactive
        );
    }

    #[test]
    fn users_without_grant_are_denied() {
        let principal = principal(UserRole::User, 3);
        let dashboard = dashboard(10, DashboardStatus::Active);

        let decision = AccessPolicy::decide(&principal, &dashboard, false);
        assert_eq!(decision, AccessDecision::NoGrant);
        assert!(!decision.is_granted());
    }

    #[test]
    fn users_with_grant_are_granted() {
        let principal = principal(UserRole::User, 3);
        let dashboard = dashboard(10, DashboardStatus::Active);

        assert!(AccessPolicy::decide(&principal, &dashboard, true).is_granted());
    }

    #[test]
    fn revoked_grant_denies_next_decision() {
        let principal = principal(UserRole::User, 3);
        let dashboard = dashboard(10, DashboardStatus::Active);

        let mut grant_exists = true;
        assert!(AccessPolicy::decide(&principal, &dashboard, grant_exists).is_granted());

        grant_exists = false;
        assert_eq!(
            AccessPolicy::decide(&principal, &dashboard, grant_exists),
            AccessDecision::NoGrant
        );
    }
}
