//! # Version Metadata Report
//!
//! **What this example teaches:**
//! - Binding a `VersionInfo` reader to a .NET assembly on disk
//! - Reading every kind of version metadata through `get_version`
//! - Listing the raw assembly level custom attributes behind the values
//! - Reading this crate's own build metadata when no assembly is given
//!
//! Run with `RUST_LOG=dotversion=debug` to see which values came from the attribute scan.

use dotversion::prelude::*;
use std::{env, path::Path, sync::Arc};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let info = match args.get(1) {
        Some(path) => {
            let module = CilModule::from_file(Path::new(path))?;
            println!("Version metadata of: {}", path);
            print_attributes(&module)?;
            VersionInfo::from(Arc::new(module) as ModuleRc)
        }
        None => {
            eprintln!("Usage: {} [path-to-dotnet-assembly]", args[0]);
            eprintln!("Without an assembly, this crate's own metadata is shown.");
            eprintln!();
            VersionInfo::default()
        }
    };

    println!("\nModule: {}", info.module().name());
    for (kind, value) in info.entries() {
        let value = if value.is_empty() { "-" } else { value.as_str() };
        println!("  {:<16} ({:>2}) {}", kind.to_string(), kind.code(), value);
    }

    Ok(())
}

fn print_attributes(module: &CilModule) -> Result<()> {
    let attributes = module.attributes()?;
    println!("\nAssembly attributes ({}):", attributes.len());

    for attribute in &attributes {
        let arguments: Vec<String> = attribute
            .value
            .fixed_args
            .iter()
            .map(|argument| format!("{argument:?}"))
            .collect();
        println!("  {}({})", attribute.type_name, arguments.join(", "));

        for named in &attribute.value.named_args {
            println!("      {} = {}", named.name, named.value);
        }
    }

    Ok(())
}
