//! xrhidgen
//!
//! Prints an `X-Rh-Identity` header value for a chosen identity type, e.g.
//!
//! ```text
//! curl -H "X-Rh-Identity: $(xrhidgen --account-number 540155 user)" \
//!     localhost:8080/api/module-update-router/v1/channel?module=insights-core
//! ```

use axum_helpers::XRhIdentity;
use axum_helpers::identity::{Associate, Internal, Principal, System, User, X509};
use clap::{Args, Parser, Subcommand};
use core_config::tracing::install_color_eyre;
use eyre::Result;

#[derive(Parser, Debug)]
#[command(name = "xrhidgen")]
#[command(about = "Generate a base64 encoded X-Rh-Identity header value")]
struct Cli {
    /// Value of identity.type (defaults per subcommand)
    #[arg(long = "type", global = true)]
    kind: Option<String>,

    /// Value of identity.auth_type (defaults per subcommand)
    #[arg(long, global = true)]
    auth_type: Option<String>,

    /// Value of identity.account_number
    #[arg(long, global = true, default_value = "111000")]
    account_number: String,

    /// Value of identity.org_id
    #[arg(long, global = true, default_value = "10001")]
    org_id: String,

    /// Print the JSON document instead of its base64 encoding
    #[arg(long, global = true)]
    raw: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a user identity
    User(UserArgs),
    /// Generate an internal identity
    Internal(InternalArgs),
    /// Generate a system identity
    System(SystemArgs),
    /// Generate an associate identity
    Associate(AssociateArgs),
    /// Generate an X.509 identity
    X509(X509Args),
}

#[derive(Args, Debug)]
struct UserArgs {
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    is_active: bool,
    #[arg(long, default_value = "en_US")]
    locale: String,
    #[arg(long, default_value_t = false, action = clap::ArgAction::Set)]
    is_org_admin: bool,
    #[arg(long, default_value = "test@redhat.com")]
    username: String,
    #[arg(long, default_value = "test@redhat.com")]
    email: String,
    #[arg(long = "firstname", default_value = "test")]
    first_name: String,
    #[arg(long = "lastname", default_value = "user")]
    last_name: String,
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    is_internal: bool,
    #[arg(long, default_value = "")]
    user_id: String,
}

#[derive(Args, Debug)]
struct InternalArgs {
    /// Value of identity.internal.org_id
    #[arg(long = "orgid", default_value = "10001")]
    org_id: String,
}

#[derive(Args, Debug)]
struct SystemArgs {
    #[arg(long, default_value = "760e4a9b-c0cc-4538-8b8c-09d1a6335dd2")]
    cn: String,
}

#[derive(Args, Debug)]
struct AssociateArgs {
    /// Repeat for several roles
    #[arg(long)]
    role: Vec<String>,
    #[arg(long, default_value = "test@redhat.com")]
    email: String,
    #[arg(long = "givenname", default_value = "test")]
    given_name: String,
    #[arg(long = "rhatuuid", default_value = "204f8e50-40b4-45d2-aa84-4bd7382e94d3")]
    rhat_uuid: String,
    #[arg(long, default_value = "user")]
    surname: String,
}

#[derive(Args, Debug)]
struct X509Args {
    #[arg(long, default_value = "/O=Red Hat/CN=test")]
    subject_dn: String,
    #[arg(long, default_value = "/O=Red Hat/CN=Red Hat Test CA")]
    issuer_dn: String,
}

impl Cli {
    fn identity(self) -> XRhIdentity {
        let mut principal = Principal {
            account_number: Some(self.account_number),
            org_id: self.org_id,
            ..Principal::default()
        };

        let (kind, auth_type) = match self.command {
            Commands::User(args) => {
                principal.user = Some(User {
                    email: args.email,
                    first_name: args.first_name,
                    is_active: args.is_active,
                    is_internal: args.is_internal,
                    is_org_admin: args.is_org_admin,
                    last_name: args.last_name,
                    locale: args.locale,
                    user_id: args.user_id,
                    username: args.username,
                });
                ("User", Some("basic-auth"))
            }
            Commands::Internal(args) => {
                principal.internal = Some(Internal {
                    org_id: args.org_id,
                    ..Internal::default()
                });
                ("Internal", None)
            }
            Commands::System(args) => {
                principal.system = Some(System {
                    cn: args.cn,
                    ..System::default()
                });
                ("System", Some("cert-auth"))
            }
            Commands::Associate(args) => {
                principal.associate = Some(Associate {
                    role: args.role,
                    email: args.email,
                    given_name: args.given_name,
                    rhat_uuid: args.rhat_uuid,
                    surname: args.surname,
                });
                ("Associate", Some("basic-auth"))
            }
            Commands::X509(args) => {
                principal.x509 = Some(X509 {
                    subject_dn: args.subject_dn,
                    issuer_dn: args.issuer_dn,
                });
                ("X509", Some("cert-auth"))
            }
        };

        principal.kind = Some(self.kind.unwrap_or_else(|| kind.to_string()));
        principal.auth_type = self.auth_type.or(auth_type.map(str::to_string));

        XRhIdentity {
            entitlements: None,
            identity: principal,
        }
    }
}

fn main() -> Result<()> {
    install_color_eyre();

    let cli = Cli::parse();
    let raw = cli.raw;
    let identity = cli.identity();

    if raw {
        println!("{}", serde_json::to_string(&identity)?);
    } else {
        println!("{}", identity.encode()?);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(args: &[&str]) -> XRhIdentity {
        let argv = std::iter::once("xrhidgen").chain(args.iter().copied());
        Cli::try_parse_from(argv).unwrap().identity()
    }

    #[test]
    fn test_user_defaults() {
        let id = identity(&["user"]);

        assert_eq!(id.identity.account(), "111000");
        assert_eq!(id.identity.kind.as_deref(), Some("User"));
        assert_eq!(id.identity.auth_type.as_deref(), Some("basic-auth"));
        let user = id.identity.user.unwrap();
        assert_eq!(user.username, "test@redhat.com");
        assert!(user.is_active);
        assert!(!user.is_org_admin);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let id = identity(&["system", "--account-number", "540155", "--auth-type", "jwt"]);

        assert_eq!(id.identity.account(), "540155");
        assert_eq!(id.identity.auth_type.as_deref(), Some("jwt"));
        assert_eq!(
            id.identity.system.unwrap().cn,
            "760e4a9b-c0cc-4538-8b8c-09d1a6335dd2"
        );
    }

    #[test]
    fn test_internal_has_no_default_auth_type() {
        let id = identity(&["internal", "--orgid", "42"]);

        assert_eq!(id.identity.auth_type, None);
        assert_eq!(id.identity.internal.unwrap().org_id, "42");
    }

    #[test]
    fn test_associate_roles_repeat() {
        let id = identity(&["associate", "--role", "admin", "--role", "viewer"]);

        assert_eq!(id.identity.associate.unwrap().role, ["admin", "viewer"]);
    }

    #[test]
    fn test_encoded_output_decodes() {
        let id = identity(&["--type", "Custom", "x509"]);
        let decoded = XRhIdentity::decode(&id.encode().unwrap()).unwrap();

        assert_eq!(decoded, id);
        assert_eq!(decoded.identity.kind.as_deref(), Some("Custom"));
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
