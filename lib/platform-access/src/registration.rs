//! Account registration.

use rootcause::prelude::{Report, ResultExt};
use serde::Deserialize;
use tracing::{debug, instrument};
use validator::{Validate, ValidationErrors};

use crate::directory::UserDirectory;
use crate::error::{DirectoryError, FieldErrors, RegistrationError};
use crate::password::hash_password;
use crate::user::{Account, User};

/// A registration request body as submitted by a client.
#[derive(Clone, Deserialize, Validate)]
pub struct NewUser {
    /// Login email address.
    #[validate(
        length(min = 1, message = "Email can not be blank."),
        email(message = "Email does not match the email format.")
    )]
    pub email: String,
    /// Chosen password.
    #[validate(length(min = 1, message = "Password can not be blank."))]
    pub password: String,
    /// Must equal `password`.
    pub confirm_password: String,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl NewUser {
    /// Checks the request fields without touching storage.
    ///
    /// A confirmation mismatch is reported on its own, before any field rules.
    pub fn check(&self) -> Result<(), RegistrationError> {
        if self.password != self.confirm_password {
            return Err(RegistrationError::PasswordMismatch);
        }
        self.validate().map_err(|errors| RegistrationError::Invalid {
            fields: field_errors(&errors),
        })
    }
}

/// Flattens validator output into messages keyed by field name.
fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let messages = errors
                .iter()
                .map(|e| match &e.message {
                    Some(message) => message.to_string(),
                    None => e.code.to_string(),
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

fn email_taken() -> RegistrationError {
    let mut fields = FieldErrors::new();
    fields.insert("email".to_string(), vec!["Email is already taken.".to_string()]);
    RegistrationError::Invalid { fields }
}

/// Creates a new account with no roles.
///
/// The password is hashed on the blocking pool before the account is stored.
#[instrument(skip_all, fields(email = %request.email))]
pub async fn register<D>(
    request: NewUser,
    directory: &mut D,
) -> Result<User, Report<RegistrationError>>
where
    D: UserDirectory + ?Sized,
{
    request.check()?;

    let NewUser {
        email, password, ..
    } = request;
    let hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| RegistrationError::Hashing {
            details: e.to_string(),
        })?
        .map_err(|e| RegistrationError::Hashing {
            details: e.to_string(),
        })?;

    let account = Account::new(User::new(email), hash);
    match directory.insert(&account).await {
        Ok(()) => {}
        Err(report) if matches!(report.current_context(), DirectoryError::EmailTaken { .. }) => {
            return Err(email_taken().into());
        }
        Err(report) => return Err(report).context(RegistrationError::Directory),
    }

    let user = account.into_user();
    debug!(user_id = %user.id(), "registered user");
    Ok(user)
}
