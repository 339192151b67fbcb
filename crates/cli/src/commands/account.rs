//! Mock login commands.
//!
//! # Usage
//!
//! ```bash
//! bq-cli login 0501234567 --code 1234
//! bq-cli whoami --set-name "نورة"
//! bq-cli logout
//! ```

use bouquet_storefront::Storefront;
use serde_json::Value;

use super::Result;
use crate::output::{Output, symbols};

/// Request a code and verify it in one go.
pub fn login(storefront: &Storefront, out: Output, phone: &str, code: &str) -> Result<()> {
    let pending = storefront.auth().request_code(phone)?;
    let session = storefront.auth().verify(&pending, code)?;
    out.success(&format!("Signed in as {}", session.display_name()), &session)?;
    Ok(())
}

/// Show the session, optionally renaming the user first.
pub fn whoami(storefront: &Storefront, out: Output, set_name: Option<&str>) -> Result<()> {
    if let Some(name) = set_name {
        storefront.auth().update_name(name)?;
    }

    match storefront.auth().current() {
        Some(session) => out.emit(&session, || {
            format!(
                "{} {} ({})\n  signed in {}",
                symbols::INFO,
                session.display_name(),
                session.phone.local(),
                session.logged_in_at.format("%Y-%m-%d %H:%M UTC")
            )
        })?,
        None => out.emit(&Value::Null, || "Not signed in".to_string())?,
    }
    Ok(())
}

/// Sign out.
pub fn logout(storefront: &Storefront, out: Output) -> Result<()> {
    storefront.auth().logout()?;
    out.success("Signed out", &Value::Null)?;
    Ok(())
}
