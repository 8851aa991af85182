use std::sync::Arc;

use axum::http::StatusCode;
use folio_extern_contracts::contact::{ContactApiRequest, ContactApiService};
use folio_extern_impl::contact::{ContactApiServiceConfig, ContactApiServiceImpl};
use folio_testing::contact::{FakeContactEndpoint, ReceivedSubmission, CONTACT_ROUTE};

#[tokio::test]
async fn ok() {
    let (sut, fake) = make_sut(StatusCode::OK).await;

    sut.submit(request()).await.unwrap();

    assert_eq!(
        fake.received(),
        [ReceivedSubmission {
            name: "Jo".into(),
            email: "jo@x.com".into(),
            subject: "Hello there".into(),
            message: "This is a message".into(),
        }]
    );
}

#[tokio::test]
async fn client_error() {
    let (sut, fake) = make_sut(StatusCode::BAD_REQUEST).await;

    let result = sut.submit(request()).await;

    assert!(result.is_err());
    assert_eq!(fake.received().len(), 1);
}

#[tokio::test]
async fn server_error() {
    let (sut, fake) = make_sut(StatusCode::INTERNAL_SERVER_ERROR).await;

    let result = sut.submit(request()).await;

    assert!(result.is_err());
    assert_eq!(fake.received().len(), 1);
}

fn request() -> ContactApiRequest {
    ContactApiRequest {
        name: "Jo".into(),
        email: "jo@x.com".into(),
        subject: "Hello there".into(),
        message: "This is a message".into(),
    }
}

async fn make_sut(status: StatusCode) -> (ContactApiServiceImpl, Arc<FakeContactEndpoint>) {
    let fake = FakeContactEndpoint::new(status);
    let base_url = folio_testing::spawn(folio_testing::contact::router(Arc::clone(&fake)))
        .await
        .unwrap();

    let config = ContactApiServiceConfig {
        endpoint: base_url.join(CONTACT_ROUTE).unwrap().into(),
    };
    (ContactApiServiceImpl::new(config), fake)
}
