//! Integration tests against the public `depot_db` surface.

use depot_core::entities::{ContactSubmission, Identity, NewMessage, Role};
use depot_core::enums::{AdminRole, IdentityTable, InboxFilter};
use depot_core::policy::predicate;
use depot_db::service::DepotService;
use depot_db::updates::message::FlagUpdateBuilder;
use pretty_assertions::assert_eq;

async fn identity(svc: &DepotService, table: IdentityTable, email: &str) -> Identity {
    let role = (table == IdentityTable::Admin).then_some("admin");
    svc.register_identity(table, email, None, role)
        .await
        .unwrap()
        .to_identity()
}

#[tokio::test]
async fn data_survives_reopening_a_file_database() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("depot.db");
    let path = path.to_str().unwrap();

    let id = {
        let svc = DepotService::new_local(path).await.unwrap();
        let c = identity(&svc, IdentityTable::Coordinator, "c@x.com").await;
        svc.create_message(
            &c,
            &NewMessage {
                receiver_email: "d@x.com".into(),
                body: "Bus down".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .id
    };

    let svc = DepotService::new_local(path).await.unwrap();
    let msg = svc.get_message(&id).await.unwrap();
    assert_eq!(msg.body, "Bus down");
}

#[tokio::test]
async fn admin_sees_everything_except_own_traffic() {
    let svc = DepotService::new_local(":memory:").await.unwrap();
    let admin = identity(&svc, IdentityTable::Admin, "a@x.com").await;
    assert_eq!(
        admin.role,
        Role::Admin {
            sub_role: AdminRole::Admin
        }
    );
    let c = identity(&svc, IdentityTable::Coordinator, "c@x.com").await;

    let to_driver = |body: &str| NewMessage {
        receiver_email: "d@x.com".into(),
        body: body.into(),
        ..Default::default()
    };
    let own = svc.create_message(&admin, &to_driver("from admin")).await.unwrap();
    let other = svc.create_message(&c, &to_driver("from coordinator")).await.unwrap();

    let inbox = svc
        .list_messages(&predicate(&admin, InboxFilter::Inbox), 100)
        .await
        .unwrap();
    assert_eq!(inbox.iter().map(|m| m.id.clone()).collect::<Vec<_>>(), vec![other.id]);

    let sent = svc
        .list_messages(&predicate(&admin, InboxFilter::Sent), 100)
        .await
        .unwrap();
    assert_eq!(sent.iter().map(|m| m.id.clone()).collect::<Vec<_>>(), vec![own.id]);
}

#[tokio::test]
async fn starred_tab_reflects_flag_updates() {
    let svc = DepotService::new_local(":memory:").await.unwrap();
    let c = identity(&svc, IdentityTable::Coordinator, "c@x.com").await;
    let d = identity(&svc, IdentityTable::Driver, "d@x.com").await;
    let msg = svc
        .create_message(
            &c,
            &NewMessage {
                receiver_email: "d@x.com".into(),
                body: "Bus down".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let starred = predicate(&d, InboxFilter::Starred);
    assert!(svc.list_messages(&starred, 100).await.unwrap().is_empty());

    svc.update_message_flags(&msg.id, &FlagUpdateBuilder::new().is_starred(true).build())
        .await
        .unwrap();
    assert_eq!(svc.list_messages(&starred, 100).await.unwrap().len(), 1);
}

#[tokio::test]
async fn contact_form_rows_are_independent_of_messages() {
    let svc = DepotService::new_local(":memory:").await.unwrap();
    svc.submit_contact_us(&ContactSubmission {
        name: "Pat".into(),
        email: "pat@y.org".into(),
        message: "Hello".into(),
        ..Default::default()
    })
    .await
    .unwrap();
    let c = identity(&svc, IdentityTable::Coordinator, "c@x.com").await;
    assert!(svc
        .list_messages(&predicate(&c, InboxFilter::Inbox), 100)
        .await
        .unwrap()
        .is_empty());
    assert_eq!(svc.list_contact_us(100).await.unwrap().len(), 1);
}
