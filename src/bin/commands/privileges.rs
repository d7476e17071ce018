use clap::Args;
use schemaprobe::extract::TemplateAdminProbe;
use schemaprobe::lens::enumerate::{EnumerationScope, PrivilegeRow};
use schemaprobe::lens::utils::OutputFormat;
use schemaprobe::ProbeConfig;

use super::{open_session, print_rows};

/// Arguments for the Privileges command
#[derive(Args)]
pub struct PrivilegesArgs {
    /// User to check (default: every enumerated user)
    #[clap(short = 'U', long = "user", value_name = "USER")]
    pub user: Option<String>,
}

pub fn run(config: &ProbeConfig, args: PrivilegesArgs, output_format: OutputFormat) {
    let PrivilegesArgs { user } = args;
    let scope = EnumerationScope {
        user,
        ..Default::default()
    };

    let session = open_session(config);
    let probe = TemplateAdminProbe::new(
        &session.extractor,
        &session.dialect,
        session.selector.clone(),
    );
    let mut lens = session.lens();

    let (privileges, admins) = match lens.get_privileges(&probe, &scope) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    print_rows(&PrivilegeRow::from_map(&privileges), output_format);
    if !output_format.is_json() && !admins.is_empty() {
        println!(
            "Administrators: {}",
            admins.into_iter().collect::<Vec<_>>().join(", ")
        );
    }
}
