use std::sync::Arc;

use folio_email_contracts::{Email, EmailSendError, EmailService};
use folio_email_impl::smtp::SmtpEmailServiceImpl;
use folio_testing::smtp::FakeSmtp;

#[tokio::test]
async fn send_email() {
    let (sut, fake) = setup().await;

    let ack = sut.send(email("me@example.com")).await.unwrap();

    assert!(ack.id.is_none());
    let received = fake.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].from, "contact@example.com");
    assert_eq!(received[0].to, ["me@example.com"]);
    assert!(received[0].data.contains("Subject: Portfolio Contact: Hello there"));
    assert!(received[0].data.contains("Reply-To: jo@x.com"));
    assert!(received[0].data.contains("This is a message"));
}

#[tokio::test]
async fn permanent_refusal_is_a_rejection() {
    let (sut, fake) = setup().await;

    let result = sut.send(email("reject@example.com")).await;

    assert!(matches!(result, Err(EmailSendError::Rejected(_))));
    assert!(fake.received().is_empty());
}

#[tokio::test]
async fn transient_refusal_is_not_a_rejection() {
    let (sut, fake) = setup().await;

    let result = sut.send(email("busy@example.com")).await;

    assert!(matches!(result, Err(EmailSendError::Other(_))));
    assert!(fake.received().is_empty());
}

#[tokio::test]
async fn ping() {
    let (sut, _) = setup().await;

    sut.ping().await.unwrap();
}

fn email(recipient: &str) -> Email {
    Email {
        recipient: recipient.parse().unwrap(),
        subject: "Portfolio Contact: Hello there".into(),
        text: "This is a message".into(),
        html: None,
        reply_to: Some("jo@x.com".into()),
    }
}

async fn setup() -> (SmtpEmailServiceImpl, Arc<FakeSmtp>) {
    let fake = FakeSmtp::new();
    let url = folio_testing::smtp::spawn(Arc::clone(&fake)).await.unwrap();

    let sut = SmtpEmailServiceImpl::new(
        url.as_str(),
        "Portfolio Contact <contact@example.com>".parse().unwrap(),
    )
    .unwrap();

    (sut, fake)
}
