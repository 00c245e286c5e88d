use crate::cli::args::CliArgs;
use crate::controller::SortOrder;
use crate::output::OutputFormat;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(raw) = args.sort.as_deref() {
        SortOrder::parse(raw).ok_or_else(|| format!("invalid --sort '{raw}', expected asc or desc"))?;
    }
    if let Some(raw) = args.output_format.as_deref() {
        OutputFormat::parse(raw)
            .ok_or_else(|| format!("invalid --output-format '{raw}', expected text, json or html"))?;
    }
    if let Some(page) = args.page {
        if page == 0 {
            return Err("invalid page, expected positive integer".to_string());
        }
    }
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            return Err("invalid timeout, expected positive integer".to_string());
        }
    }
    if let Some(raw) = args.url.as_deref() {
        crate::client::parse_base_url(raw).map_err(|e| e.to_string())?;
    }
    if args.interactive && args.output.is_some() {
        return Err("--interactive writes to the terminal, drop --output".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(extra: &[&str]) -> CliArgs {
        let mut argv = vec!["tinyca-dashboard"];
        argv.extend_from_slice(extra);
        CliArgs::parse_from(argv)
    }

    #[test]
    fn accepts_defaults() {
        assert!(validate(&args(&[])).is_ok());
        assert!(validate(&args(&["--sort", "asc", "-O", "json", "--page", "2"])).is_ok());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(validate(&args(&["--sort", "sideways"])).is_err());
        assert!(validate(&args(&["--output-format", "xml"])).is_err());
        assert!(validate(&args(&["--page", "0"])).is_err());
        assert!(validate(&args(&["--timeout", "0"])).is_err());
        assert!(validate(&args(&["--url", "not a url"])).is_err());
        assert!(validate(&args(&["-I", "-o", "x.html"])).is_err());
    }
}
