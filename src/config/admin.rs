use crate::error::{BadEnvVarSnafu, BcryptSnafu, EmailSnafu, ShowcaseResult};
use dotenvy::var;
use email_address::EmailAddress;
use secrecy::{ExposeSecret, SecretString};
use snafu::ResultExt;
use std::str::FromStr;

/// The single admin account. Credentials come from the environment, never from the source.
#[derive(Debug)]
pub struct AdminConfig {
    email: EmailAddress,
    bcrypt_hashed_password: SecretString,
}

impl AdminConfig {
    ///`ADMIN_PASSWORD_HASH` wins if both it and `ADMIN_PASSWORD` are set
    pub fn new() -> ShowcaseResult<Self> {
        let email = var("ADMIN_EMAIL").context(BadEnvVarSnafu {
            name: "ADMIN_EMAIL",
        })?;
        let email = EmailAddress::from_str(email.trim()).context(EmailSnafu)?;

        let bcrypt_hashed_password = if let Ok(hash) = var("ADMIN_PASSWORD_HASH") {
            SecretString::from(hash)
        } else {
            let password = SecretString::from(var("ADMIN_PASSWORD").context(BadEnvVarSnafu {
                name: "ADMIN_PASSWORD",
            })?);
            warn!("ADMIN_PASSWORD_HASH not set, hashing ADMIN_PASSWORD at startup");
            hash_plain_password(&email, &password, bcrypt::DEFAULT_COST)?
        };

        Ok(Self::from_parts(email, bcrypt_hashed_password))
    }

    pub const fn from_parts(email: EmailAddress, bcrypt_hashed_password: SecretString) -> Self {
        Self {
            email,
            bcrypt_hashed_password,
        }
    }

    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub const fn hashed_password(&self) -> &SecretString {
        &self.bcrypt_hashed_password
    }

    ///blocking - bcrypt is deliberately slow, so call this from `spawn_blocking`
    pub fn verify(&self, email: &str, password: &SecretString) -> ShowcaseResult<bool> {
        if email != self.email.as_str() {
            return Ok(false);
        }

        bcrypt::verify(
            password.expose_secret(),
            self.bcrypt_hashed_password.expose_secret(),
        )
        .context(BcryptSnafu)
    }
}

///The salt is derived from the email, so the same password hashes the same way on every boot.
///Sessions are tied to the hash, and a fresh salt would log the admin out on each restart.
fn hash_plain_password(
    email: &EmailAddress,
    password: &SecretString,
    cost: u32,
) -> ShowcaseResult<SecretString> {
    let mut salt = [0_u8; 16];
    for (i, byte) in email.as_str().bytes().enumerate() {
        salt[i % 16] = salt[i % 16].rotate_left(3) ^ byte;
    }

    let parts = bcrypt::hash_with_salt(password.expose_secret(), cost, salt).context(BcryptSnafu)?;
    Ok(SecretString::from(parts.format_for_version(bcrypt::Version::TwoB)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AdminConfig {
        let hash = bcrypt::hash("correct horse", 4).unwrap();
        AdminConfig::from_parts(
            EmailAddress::from_str("admin@example.org").unwrap(),
            SecretString::from(hash),
        )
    }

    #[test]
    fn exact_pair_verifies() {
        let config = config();
        assert!(
            config
                .verify("admin@example.org", &SecretString::from("correct horse"))
                .unwrap()
        );
    }

    #[test]
    fn wrong_password_or_email_is_rejected() {
        let config = config();
        assert!(
            !config
                .verify("admin@example.org", &SecretString::from("correct horse "))
                .unwrap()
        );
        assert!(
            !config
                .verify("Admin@example.org", &SecretString::from("correct horse"))
                .unwrap()
        );
        assert!(
            !config
                .verify("someone@example.org", &SecretString::from("correct horse"))
                .unwrap()
        );
        assert!(!config.verify("", &SecretString::from("")).unwrap());
    }

    #[test]
    fn plain_password_hashes_the_same_on_every_boot() {
        let email = EmailAddress::from_str("admin@example.org").unwrap();
        let password = SecretString::from("correct horse");

        let first = hash_plain_password(&email, &password, 4).unwrap();
        let second = hash_plain_password(&email, &password, 4).unwrap();
        assert_eq!(first.expose_secret(), second.expose_secret());

        let config = AdminConfig::from_parts(email, first);
        assert!(config.verify("admin@example.org", &password).unwrap());
        assert!(!config.verify("admin@example.org", &SecretString::from("wrong")).unwrap());
    }
}
