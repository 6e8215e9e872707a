//! Tests for the queue service facade.

use super::*;
use crate::queue::DEFAULT_VISIBILITY_TIMEOUT;
use bytes::Bytes;

fn service() -> QueueService {
    QueueService::new(Arc::new(QueueManager::new(DEFAULT_VISIBILITY_TIMEOUT)))
}

fn tenant(id: &str) -> TenantId {
    TenantId::new(id)
}

#[test]
fn create_publish_consume_delete_round_trips() {
    let svc = service();
    let t = tenant("acct");
    svc.create_queue(t.clone(), "q1").unwrap();
    let name = QueueName::new("q1").unwrap();

    svc.publish(&t, &name, Bytes::from_static(b"hello")).unwrap();
    let message = svc.consume(&t, &name).unwrap();
    assert_eq!(&message.data[..], b"hello");

    svc.delete(&t, &name, message.id).unwrap();
    assert!(matches!(svc.consume(&t, &name), Err(Error::QueueEmpty)));
}

#[test]
fn duplicate_create_surfaces_already_exists() {
    let svc = service();
    let t = tenant("acct");
    svc.create_queue(t.clone(), "q").unwrap();
    let err = svc.create_queue(t, "q").unwrap_err();
    assert!(matches!(err, Error::AlreadyExists(_)));
}

#[test]
fn operations_on_missing_queue_surface_not_found() {
    let svc = service();
    let t = tenant("acct");
    let name = QueueName::new("missing").unwrap();
    assert!(matches!(
        svc.publish(&t, &name, Bytes::new()),
        Err(Error::QueueNotFound(_))
    ));
    assert!(matches!(svc.consume(&t, &name), Err(Error::QueueNotFound(_))));
    assert!(matches!(
        svc.delete(&t, &name, MessageId::fresh()),
        Err(Error::QueueNotFound(_))
    ));
}

#[test]
fn tenant_b_cannot_see_tenant_a_queue() {
    let svc = service();
    let a = tenant("a");
    let b = tenant("b");
    svc.create_queue(a.clone(), "q").unwrap();
    let name = QueueName::new("q").unwrap();

    svc.publish(&a, &name, Bytes::from_static(b"secret")).unwrap();
    assert!(matches!(svc.consume(&b, &name), Err(Error::QueueNotFound(_))));
}

#[test]
fn list_queues_returns_names_for_tenant() {
    let svc = service();
    let t = tenant("acct");
    svc.create_queue(t.clone(), "q1").unwrap();
    svc.create_queue(t.clone(), "q2").unwrap();

    let mut names = svc.list_queues(&t);
    names.sort();
    assert_eq!(names, vec!["q1".to_string(), "q2".to_string()]);
}
