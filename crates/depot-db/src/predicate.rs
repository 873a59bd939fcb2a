//! Translate a visibility [`QueryPredicate`] into a SQL `WHERE` fragment.

use depot_core::policy::{Condition, Operand, QueryPredicate};

/// Build `AND`-joined conditions over the `contact` table, with positional
/// parameters numbered from `start_param`.
///
/// Returns the fragment (starting with `AND`, or empty when there are no
/// conditions) and the parameter values in order. Columns are qualified with
/// `c.` to match the listing query's alias.
#[must_use]
pub fn predicate_sql(predicate: &QueryPredicate, start_param: u32) -> (String, Vec<libsql::Value>) {
    let mut clauses = Vec::with_capacity(predicate.conditions.len());
    let mut params: Vec<libsql::Value> = Vec::with_capacity(predicate.conditions.len());
    let mut idx = start_param;

    for Condition {
        column,
        comparison,
        operand,
    } in &predicate.conditions
    {
        clauses.push(format!(
            "c.{} {} ?{idx}",
            column.sql_name(),
            comparison.sql_operator()
        ));
        params.push(match operand {
            Operand::Text(v) => v.as_str().into(),
            Operand::Flag(v) => i64::from(*v).into(),
        });
        idx += 1;
    }

    if clauses.is_empty() {
        (String::new(), params)
    } else {
        (format!("AND {}", clauses.join(" AND ")), params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depot_core::entities::{Identity, Role};
    use depot_core::enums::{AdminRole, InboxFilter};
    use depot_core::policy::predicate;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn driver() -> Identity {
        Identity {
            role: Role::Driver,
            id: "drv-00000001".into(),
            email: "d@x.com".into(),
        }
    }

    fn admin() -> Identity {
        Identity {
            role: Role::Admin {
                sub_role: AdminRole::Admin,
            },
            id: "adm-00000001".into(),
            email: "a@x.com".into(),
        }
    }

    #[rstest]
    #[case::driver_inbox(driver(), InboxFilter::Inbox, "AND c.receiver_email = ?1")]
    #[case::driver_sent(driver(), InboxFilter::Sent, "AND c.sender_email = ?1")]
    #[case::driver_starred(
        driver(),
        InboxFilter::Starred,
        "AND c.receiver_email = ?1 AND c.is_starred = ?2"
    )]
    #[case::driver_trash(driver(), InboxFilter::Trash, "AND c.receiver_email = ?1")]
    #[case::admin_inbox(admin(), InboxFilter::Inbox, "AND c.sender_email != ?1")]
    #[case::admin_sent(admin(), InboxFilter::Sent, "AND c.sender_email = ?1")]
    #[case::admin_important(admin(), InboxFilter::Important, "AND c.sender_email != ?1")]
    fn fragment_per_role_and_filter(
        #[case] who: Identity,
        #[case] filter: InboxFilter,
        #[case] expected: &str,
    ) {
        let (sql, params) = predicate_sql(&predicate(&who, filter), 1);
        assert_eq!(sql, expected);
        assert_eq!(params.len(), sql.matches('?').count());
        assert!(matches!(&params[0], libsql::Value::Text(t) if *t == who.email));
    }

    #[test]
    fn driver_important_is_receiver_and_unread() {
        let (sql, params) = predicate_sql(&predicate(&driver(), InboxFilter::Important), 1);
        assert_eq!(sql, "AND c.receiver_email = ?1 AND c.is_read = ?2");
        assert!(matches!(&params[0], libsql::Value::Text(t) if t == "d@x.com"));
        assert!(matches!(params[1], libsql::Value::Integer(0)));
    }

    #[test]
    fn admin_inbox_uses_not_equal() {
        let admin = Identity {
            role: Role::Admin {
                sub_role: AdminRole::Viewer,
            },
            id: "adm-00000001".into(),
            email: "a@x.com".into(),
        };
        let (sql, _) = predicate_sql(&predicate(&admin, InboxFilter::Inbox), 3);
        assert_eq!(sql, "AND c.sender_email != ?3");
    }

    #[test]
    fn empty_predicate_yields_empty_fragment() {
        let (sql, params) = predicate_sql(
            &QueryPredicate {
                conditions: vec![],
                include_external: false,
            },
            1,
        );
        assert!(sql.is_empty());
        assert!(params.is_empty());
    }
}
