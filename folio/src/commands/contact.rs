use std::{net::SocketAddr, sync::Arc};

use clap::Subcommand;
use folio_client::{ContactForm, ContactFormConfig, ContactFormFields, ContactFormSubmitError};
use folio_config::Config;
use folio_extern_impl::contact::{ContactApiServiceConfig, ContactApiServiceImpl};
use url::Url;

#[derive(Debug, Subcommand)]
pub enum ContactCommand {
    /// Submit the contact form to a running server
    #[command(aliases(["s"]))]
    Send {
        /// Submission endpoint [default: the configured http address]
        #[arg(long)]
        endpoint: Option<Url>,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        message: String,
    },
}

impl ContactCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        match self {
            ContactCommand::Send {
                endpoint,
                name,
                email,
                subject,
                message,
            } => {
                let endpoint = match endpoint {
                    Some(endpoint) => endpoint,
                    None => default_endpoint(&config)?,
                };
                send(
                    endpoint,
                    ContactFormFields {
                        name,
                        email,
                        subject,
                        message,
                    },
                )
                .await
            }
        }
    }
}

fn default_endpoint(config: &Config) -> anyhow::Result<Url> {
    let addr = SocketAddr::new(config.http.host, config.http.port);
    format!("http://{addr}/api/contact")
        .parse()
        .map_err(Into::into)
}

async fn send(endpoint: Url, fields: ContactFormFields) -> anyhow::Result<()> {
    let api = ContactApiServiceImpl::new(ContactApiServiceConfig {
        endpoint: Arc::new(endpoint),
    });
    let form = ContactForm::new(api, ContactFormConfig::default());
    form.set_fields(fields);

    match form.submit().await {
        Ok(()) => println!("Message sent successfully!"),
        Err(ContactFormSubmitError::Invalid(errors)) => {
            for (field, error) in errors.iter() {
                println!("{field}: {error}");
            }
            anyhow::bail!("The form contains invalid fields");
        }
        Err(err) => {
            println!("Failed to send message. Please try again.");
            return Err(err.into());
        }
    }

    Ok(())
}
