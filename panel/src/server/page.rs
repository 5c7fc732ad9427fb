//! Dashboard page rendering

const DASHBOARD_TEMPLATE: &str = include_str!("../../assets/dashboard.html");

/// Values substituted into the dashboard template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardView {
    pub ct_id: String,
    pub last_log: String,
    /// `?token=...` appended to form actions, or empty
    pub token_qs: String,
}

impl DashboardView {
    fn value(&self, placeholder: &str) -> Option<&str> {
        match placeholder {
            "ct_id" => Some(&self.ct_id),
            "last_log" => Some(&self.last_log),
            "token_qs" => Some(&self.token_qs),
            _ => None,
        }
    }

    /// Render the page. Every value is HTML-escaped.
    pub fn render(&self) -> String {
        render_template(DASHBOARD_TEMPLATE, |name| self.value(name))
    }
}

/// Single pass over `{{name}}` placeholders, so substituted text is never
/// scanned again. Unknown placeholders are left as they are.
fn render_template<'a, F>(template: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<&'a str>,
{
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let name = &after[..end];
                match lookup(name.trim()) {
                    Some(value) => out.push_str(&html_escape(value)),
                    None => {
                        out.push_str("{{");
                        out.push_str(name);
                        out.push_str("}}");
                    }
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
