//! List the remote methods the client knows by name.

use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;

use wikirpc::Method;

#[derive(Args, Debug)]
pub struct MethodsArgs {
    /// Only show one namespace (wiki, dokuwiki, plugin.struct)
    #[arg(long)]
    pub namespace: Option<String>,
}

pub fn run(args: MethodsArgs) -> Result<()> {
    let methods = select(args.namespace.as_deref());
    if methods.is_empty() {
        bail!(
            "Unknown namespace '{}'",
            args.namespace.as_deref().unwrap_or_default()
        );
    }

    let mut current = "";
    for method in methods {
        if method.namespace() != current {
            current = method.namespace();
            println!("{}", current.bold());
        }
        println!("  {method}");
    }

    Ok(())
}

fn select(namespace: Option<&str>) -> Vec<Method> {
    Method::ALL
        .iter()
        .copied()
        .filter(|m| namespace.is_none_or(|ns| m.namespace() == ns))
        .collect()
}
