use demo_address_space::{DemoAddressSpace, method_id};
use uabridge_core::arguments::{ArgumentTypeCache, ArgumentTypeError};
use uabridge_core::session::DataValue;
use uabridge_core::types::{DataType, NodeId, StatusCode, Variant};

#[tokio::test]
async fn test_descriptors_are_fetched_once() {
    let session = DemoAddressSpace::standard();
    let cache = ArgumentTypeCache::new();
    let ids = [method_id("Multiply"), method_id("Hello")];

    let first = cache.get_descriptors(&session, &ids).await.unwrap();
    let second = cache.get_descriptors(&session, &ids).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first[0].len(), 2);
    assert_eq!(first[0][0].name, "a");
    assert_eq!(first[1][0].built_in_type().unwrap(), DataType::String);

    assert_eq!(session.browse_count(), 1);
    assert_eq!(session.read_count(), 1);
    assert_eq!(cache.len(), 2);
}

#[tokio::test]
async fn test_only_uncached_ids_are_fetched() {
    let session = DemoAddressSpace::standard();
    let cache = ArgumentTypeCache::new();

    cache
        .get_descriptors(&session, &[method_id("Multiply")])
        .await
        .unwrap();

    let descriptors = cache
        .get_descriptors(&session, &[method_id("Multiply"), method_id("Sum")])
        .await
        .unwrap();

    assert_eq!(descriptors.len(), 2);

    let recorded = session.recorded();
    assert_eq!(recorded.browse.len(), 2);
    assert_eq!(recorded.browse[1].len(), 1);
    assert_eq!(recorded.browse[1][0].node_id, method_id("Sum"));
}

#[tokio::test]
async fn test_duplicate_ids_are_fetched_once_and_answered_in_order() {
    let session = DemoAddressSpace::standard();
    let cache = ArgumentTypeCache::new();
    let ids = [
        method_id("Hello"),
        method_id("Multiply"),
        method_id("Hello"),
    ];

    let descriptors = cache.get_descriptors(&session, &ids).await.unwrap();

    assert_eq!(descriptors.len(), 3);
    assert_eq!(descriptors[0], descriptors[2]);
    assert_eq!(descriptors[1].len(), 2);
    assert_eq!(session.recorded().browse[0].len(), 2);
}

#[tokio::test]
async fn test_method_without_property_caches_empty_list_without_read() {
    let session = DemoAddressSpace::standard();
    let cache = ArgumentTypeCache::new();

    let descriptors = cache
        .get_descriptors(&session, &[method_id("Reset")])
        .await
        .unwrap();

    assert!(descriptors[0].is_empty());
    assert_eq!(session.read_count(), 0);
    assert_eq!(cache.cached(&method_id("Reset")).map(|d| d.len()), Some(0));
}

#[tokio::test]
async fn test_cached_never_contacts_the_session() {
    let session = DemoAddressSpace::standard();
    let cache = ArgumentTypeCache::new();

    assert!(cache.is_empty());
    assert!(cache.cached(&method_id("Multiply")).is_none());

    cache
        .get_descriptors(&session, &[method_id("Multiply")])
        .await
        .unwrap();

    session.set_unavailable(true);

    assert!(cache.cached(&method_id("Multiply")).is_some());
    assert!(
        cache
            .get_descriptors(&session, &[method_id("Multiply")])
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_bad_browse_status_fails_the_batch() {
    let session = DemoAddressSpace::standard()
        .with_browse_status(&method_id("Sum"), StatusCode::BAD_USER_ACCESS_DENIED);
    let cache = ArgumentTypeCache::new();

    let err = cache
        .get_descriptors(&session, &[method_id("Multiply"), method_id("Sum")])
        .await
        .unwrap_err();

    match err {
        ArgumentTypeError::RemoteBrowseError { method_id: id, status } => {
            assert_eq!(id, method_id("Sum"));
            assert_eq!(status, StatusCode::BAD_USER_ACCESS_DENIED);
        }
        other => panic!("Unexpected error: {other}"),
    }

    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_unknown_method_fails_browse() {
    let session = DemoAddressSpace::standard();
    let cache = ArgumentTypeCache::new();

    let err = cache
        .get_descriptors(&session, &[NodeId::numeric(1, 9999)])
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ArgumentTypeError::RemoteBrowseError {
            status: StatusCode::BAD_NODE_ID_UNKNOWN,
            ..
        }
    ));
}

#[tokio::test]
async fn test_bad_read_status_names_the_method() {
    let session = DemoAddressSpace::new().with_property_value(
        method_id("Locked"),
        DataValue::bad(StatusCode::BAD_NOT_READABLE),
        |_| Ok(Vec::new()),
    );
    let cache = ArgumentTypeCache::new();

    let err = cache
        .get_descriptors(&session, &[method_id("Locked")])
        .await
        .unwrap_err();

    match err {
        ArgumentTypeError::RemoteReadError { method_id, status } => {
            assert_eq!(method_id.to_string(), "ns=1;s=Demo.Locked");
            assert_eq!(status, StatusCode::BAD_NOT_READABLE);
        }
        other => panic!("Unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_property_of_wrong_type_is_rejected() {
    let session = DemoAddressSpace::new().with_property_value(
        method_id("Broken"),
        DataValue::new(Variant::scalar("not arguments")),
        |_| Ok(Vec::new()),
    );
    let cache = ArgumentTypeCache::new();

    let err = cache
        .get_descriptors(&session, &[method_id("Broken")])
        .await
        .unwrap_err();

    assert!(matches!(err, ArgumentTypeError::InvalidArgumentsValue(_)));
}

#[tokio::test]
async fn test_transport_failure_is_a_session_error() {
    let session = DemoAddressSpace::standard();
    session.set_unavailable(true);
    let cache = ArgumentTypeCache::new();

    let err = cache
        .get_descriptors(&session, &[method_id("Multiply")])
        .await
        .unwrap_err();

    assert!(matches!(err, ArgumentTypeError::Session(_)));
    assert_eq!(
        err.to_string(),
        "Session request failed: 'The demo session is unavailable'"
    );
}

#[tokio::test]
async fn test_concurrent_lookups_interleave() {
    let session = DemoAddressSpace::standard();
    let cache = ArgumentTypeCache::new();

    cache
        .get_descriptors(&session, &[method_id("Hello")])
        .await
        .unwrap();

    let multiply = [method_id("Multiply")];
    let hello = [method_id("Hello")];
    let multiply_sum = [method_id("Multiply"), method_id("Sum")];
    let (fetched, cached, other) = tokio::join!(
        cache.get_descriptors(&session, &multiply),
        cache.get_descriptors(&session, &hello),
        cache.get_descriptors(&session, &multiply_sum),
    );

    assert_eq!(fetched.unwrap()[0].len(), 2);
    assert_eq!(cached.unwrap()[0].len(), 1);

    let other = other.unwrap();
    assert_eq!(other[0].len(), 2);
    assert_eq!(other[1].len(), 1);

    assert_eq!(cache.len(), 3);
}

#[tokio::test]
async fn test_short_browse_response_is_a_count_mismatch() {
    let session = DemoAddressSpace::standard();
    session.set_truncated(true);
    let cache = ArgumentTypeCache::new();

    let err = cache
        .get_descriptors(&session, &[method_id("Multiply"), method_id("Hello")])
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ArgumentTypeError::ResultCountMismatch {
            expected: 2,
            actual: 1
        }
    ));
    assert_eq!(session.read_count(), 0);
    assert!(cache.is_empty());
}
