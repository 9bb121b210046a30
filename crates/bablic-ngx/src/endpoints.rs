//! URL construction for the CDN and report endpoints.

use bablic_core::config::Config;

/// `https://{cdn}[/test]/sites/{site}/ngx.{lang}.json[?r={revision}]`
pub fn translation_url(config: &Config, lang: &str, revision: Option<&str>) -> String {
    let debug_path = if config.bablic.is_debug { "/test" } else { "" };
    let mut url = format!(
        "https://{}{debug_path}/sites/{}/ngx.{lang}.json",
        config.endpoints.cdn_host, config.bablic.site_id
    );
    if let Some(r) = revision {
        url.push_str("?r=");
        url.push_str(&urlencoding::encode(r));
    }
    url
}

/// `https://{report}/api/engine/ngx-report?s={site}&l={lang}&uri={location}`
pub fn report_url(config: &Config, lang: &str, location: &str) -> String {
    format!(
        "https://{}/api/engine/ngx-report?s={}&l={lang}&uri={}",
        config.report_host(),
        config.bablic.site_id,
        urlencoding::encode(location)
    )
}
