use clap::ValueEnum;
use serde_json::json;

/// Headers the threaded engine build needs for `SharedArrayBuffer`.
pub const ISOLATION_HEADERS: [(&str, &str); 2] = [
    ("Cross-Origin-Embedder-Policy", "require-corp"),
    ("Cross-Origin-Opener-Policy", "same-origin"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HostFormat {
    /// Netlify / Cloudflare Pages `_headers` file
    Netlify,
    /// nginx `add_header` directives
    Nginx,
    /// `headers` section of vercel.json
    Vercel,
}

pub fn run(format: HostFormat) -> anyhow::Result<()> {
    print!("{}", render(format)?);
    Ok(())
}

pub fn render(format: HostFormat) -> Result<String, serde_json::Error> {
    let mut out = String::new();
    match format {
        HostFormat::Netlify => {
            out.push_str("/*\n");
            for (key, value) in ISOLATION_HEADERS {
                out.push_str(&format!("  {key}: {value}\n"));
            }
        }
        HostFormat::Nginx => {
            for (key, value) in ISOLATION_HEADERS {
                out.push_str(&format!("add_header {key} \"{value}\" always;\n"));
            }
        }
        HostFormat::Vercel => {
            let headers: Vec<serde_json::Value> = ISOLATION_HEADERS
                .iter()
                .map(|(key, value)| json!({ "key": key, "value": value }))
                .collect();
            let config = json!({
                "headers": [{ "source": "/(.*)", "headers": headers }]
            });
            out.push_str(&serde_json::to_string_pretty(&config)?);
            out.push('\n');
        }
    }
    Ok(out)
}
