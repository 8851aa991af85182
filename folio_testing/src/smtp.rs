//! Plaintext SMTP server that records every message it accepts.

use std::{
    net::{IpAddr, Ipv4Addr},
    sync::{Arc, Mutex},
};

use anyhow::Context;
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines},
    net::{tcp::OwnedReadHalf, TcpListener, TcpStream},
};
use tracing::debug;
use url::Url;

/// Local part of recipient addresses that are refused permanently (550).
pub const REJECTED_LOCAL_PART: &str = "reject";
/// Local part of recipient addresses that are refused temporarily (451).
pub const BUSY_LOCAL_PART: &str = "busy";

#[derive(Debug, Default)]
pub struct FakeSmtp {
    received: Mutex<Vec<ReceivedMail>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedMail {
    pub from: String,
    pub to: Vec<String>,
    /// The message as transmitted after `DATA`, dot-unstuffed.
    pub data: String,
}

impl FakeSmtp {
    pub fn new() -> Arc<Self> {
        Default::default()
    }

    /// Messages accepted so far, oldest first.
    pub fn received(&self) -> Vec<ReceivedMail> {
        self.received.lock().unwrap().clone()
    }
}

/// Accept SMTP sessions on an ephemeral localhost port in a background task
/// and return an `smtp://` url pointing at it.
pub async fn spawn(state: Arc<FakeSmtp>) -> anyhow::Result<Url> {
    let listener = TcpListener::bind((IpAddr::V4(Ipv4Addr::LOCALHOST), 0))
        .await
        .context("Failed to bind to an ephemeral port")?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let state = Arc::clone(&state);
            tokio::spawn(async move {
                if let Err(err) = session(stream, &state).await {
                    debug!("smtp session ended: {err:#}");
                }
            });
        }
    });

    format!("smtp://{addr}")
        .parse()
        .context("Failed to build smtp url")
}

async fn session(stream: TcpStream, state: &FakeSmtp) -> anyhow::Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();
    writer.write_all(b"220 folio-testing ESMTP\r\n").await?;

    let mut from = None;
    let mut to = Vec::new();

    while let Some(line) = lines.next_line().await? {
        let (verb, arg) = line.split_once(' ').unwrap_or((line.as_str(), ""));
        let reply = match verb.to_ascii_uppercase().as_str() {
            "EHLO" | "HELO" => "250 folio-testing",
            "NOOP" => "250 OK",
            "RSET" => {
                from = None;
                to.clear();
                "250 OK"
            }
            "MAIL" => {
                from = Some(address(arg));
                "250 OK"
            }
            "RCPT" => {
                let address = address(arg);
                match address.split_once('@').map(|(local, _)| local) {
                    Some(REJECTED_LOCAL_PART) => "550 5.1.1 Mailbox unavailable",
                    Some(BUSY_LOCAL_PART) => "451 4.3.0 Try again later",
                    _ => {
                        to.push(address);
                        "250 OK"
                    }
                }
            }
            "DATA" => {
                writer
                    .write_all(b"354 End data with <CR><LF>.<CR><LF>\r\n")
                    .await?;
                let data = read_data(&mut lines).await?;
                state.received.lock().unwrap().push(ReceivedMail {
                    from: from.take().unwrap_or_default(),
                    to: std::mem::take(&mut to),
                    data,
                });
                "250 2.0.0 Queued"
            }
            "QUIT" => {
                writer.write_all(b"221 Bye\r\n").await?;
                return Ok(());
            }
            _ => "502 Command not implemented",
        };
        writer.write_all(format!("{reply}\r\n").as_bytes()).await?;
    }

    Ok(())
}

async fn read_data(lines: &mut Lines<BufReader<OwnedReadHalf>>) -> anyhow::Result<String> {
    let mut data = String::new();
    while let Some(line) = lines.next_line().await? {
        if line == "." {
            return Ok(data);
        }
        data.push_str(line.strip_prefix('.').unwrap_or(&line));
        data.push_str("\r\n");
    }
    anyhow::bail!("Connection closed before the end of DATA")
}

/// `FROM:<jo@x.com> BODY=8BITMIME` -> `jo@x.com`
fn address(arg: &str) -> String {
    arg.split_once('<')
        .and_then(|(_, rest)| rest.split_once('>'))
        .map(|(address, _)| address.to_owned())
        .unwrap_or_default()
}
