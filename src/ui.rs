use crate::date_range::DateRange;
use crate::models::{DomainOption, LikeStatus, RankedDocument, RankedMessage, RankedObject};

pub const LIKED_ICON: &str = "icons/vote_up_active.png";
pub const UNLIKED_ICON: &str = "icons/vote_up_unactive.png";
pub const RATED_ICON: &str = "icons/vote_up_active2.png";
pub const MESSAGE_ICON: &str = "icons/activity_message.png";

#[derive(Debug, Clone)]
pub struct Messages {
    pub you_liked: String,
    pub you_and_others_prefix: String,
    pub you_and_others_suffix: String,
    pub people_liked: String,
    pub what_about_you: String,
    pub title: String,
    pub likes: String,
    pub creator: String,
    pub scope: String,
    pub period: String,
    pub settings: String,
    pub settings_hint: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            you_liked: "You liked this document.".into(),
            you_and_others_prefix: "You and".into(),
            you_and_others_suffix: "other(s) liked this document.".into(),
            people_liked: "people liked this document.".into(),
            what_about_you: "What about you?".into(),
            title: "Title".into(),
            likes: "Likes".into(),
            creator: "Creator".into(),
            scope: "Domain".into(),
            period: "Period".into(),
            settings: "Settings".into(),
            settings_hint: "Edit context settings".into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Presentation {
    pub icon_base: String,
    pub messages: Messages,
}

impl Presentation {
    pub fn new(icon_base: impl Into<String>) -> Self {
        Self {
            icon_base: icon_base.into(),
            messages: Messages::default(),
        }
    }

    fn icon(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.icon_base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn like_label(&self, status: &LikeStatus) -> String {
        let msg = &self.messages;
        if status.viewer_liked() {
            if status.likes_count <= 1 {
                msg.you_liked.clone()
            } else {
                format!(
                    "{} {} {}",
                    msg.you_and_others_prefix,
                    status.likes_count - 1,
                    msg.you_and_others_suffix
                )
            }
        } else {
            format!(
                "{} {} {}",
                status.likes_count, msg.people_liked, msg.what_about_you
            )
        }
    }

    pub fn render_like_status(&self, status: &LikeStatus) -> String {
        let label = escape_html(&self.like_label(status));
        let icon = if status.viewer_liked() { LIKED_ICON } else { UNLIKED_ICON };
        format!(
            r#"<div class="likeStatus"><img class="likeIcon jsLikeIcon" data-gadget-action="toggle" src="{src}" alt="{label}" title="{label}"/><span class="likesCount">{count} {people}</span></div>"#,
            src = escape_html(&self.icon(icon)),
            count = status.likes_count,
            people = escape_html(&self.messages.people_liked),
        )
    }

    pub fn render_leaderboard(&self, items: &[RankedObject]) -> String {
        let msg = &self.messages;
        let mut html = format!(
            r#"<table class="dataList"><thead><tr><th class="iconColumn"></th><th>{}</th><th>{}</th><th>{}</th></tr></thead><tbody>"#,
            escape_html(&msg.title),
            escape_html(&msg.likes),
            escape_html(&msg.creator)
        );
        for item in items {
            if let Some(row) = self.render_row(item) {
                html.push_str(&row);
            }
        }
        html.push_str("</tbody></table>");
        html
    }

    pub fn render_row(&self, item: &RankedObject) -> Option<String> {
        match item {
            RankedObject::Document(doc) => Some(self.document_row(doc)),
            RankedObject::Minimessage(message) => Some(self.message_row(message)),
            RankedObject::Unknown => None,
        }
    }

    fn document_row(&self, doc: &RankedDocument) -> String {
        let props = doc.document.as_ref().map(|d| &d.properties);
        let icon = props.and_then(|p| p.icon.as_deref()).unwrap_or_default();
        let title = props.and_then(|p| p.title.as_deref()).unwrap_or_default();
        let creator = props.and_then(|p| p.creator.as_deref()).unwrap_or_default();
        format!(
            r#"<tr><td><img src="{icon}"/></td><td><a href="{url}" target="_top">{title}</a></td>{rating}<td>{creator}</td></tr>"#,
            icon = escape_html(&self.icon(icon)),
            url = escape_html(doc.url.as_deref().unwrap_or("#")),
            title = escape_html(title),
            rating = self.rating_cell(doc.has_user_liked, doc.rating),
            creator = escape_html(creator),
        )
    }

    fn message_row(&self, message: &RankedMessage) -> String {
        // The rating service escapes messages and turns URLs into links.
        format!(
            r#"<tr><td><img src="{icon}"/></td><td class="miniMessage">{text}</td>{rating}<td>{actor}</td></tr>"#,
            icon = escape_html(&self.icon(MESSAGE_ICON)),
            text = message.message,
            rating = self.rating_cell(message.has_user_liked, message.rating),
            actor = escape_html(&message.actor),
        )
    }

    fn rating_cell(&self, liked: bool, rating: f64) -> String {
        let (icon, class) = if liked {
            (LIKED_ICON, "liked")
        } else {
            (RATED_ICON, "rated")
        };
        format!(
            r#"<td><img class="{class}" src="{src}"/>{rating}</td>"#,
            src = escape_html(&self.icon(icon)),
            rating = format_rating(rating),
        )
    }

    pub fn render_scope_selector(
        &self,
        options: &[DomainOption],
        selected: Option<&str>,
    ) -> String {
        let mut html = format!(
            concat!(
                r#"<div class="tools"><div class="floatR" id="contextButton">"#,
                r##"<a href="#" class="linkButton" data-gadget-toggle="domains" title="{hint}">"##,
                r#"{settings}</a></div><div id="domains" style="display: none;">"#,
                r#"<label>{scope} <select name="path" data-gadget-action="scope">"#,
            ),
            hint = escape_html(&self.messages.settings_hint),
            settings = escape_html(&self.messages.settings),
            scope = escape_html(&self.messages.scope),
        );
        for option in options {
            let marker = if Some(option.path.as_str()) == selected {
                r#" selected="selected""#
            } else {
                ""
            };
            html.push_str(&format!(
                r#"<option value="{}"{marker}>{}</option>"#,
                escape_html(&option.path),
                escape_html(&option.title)
            ));
        }
        html.push_str(r#"</select></label></div><div class="clear"></div></div>"#);
        html
    }

    pub fn render_date_range_selector(&self, selected: DateRange) -> String {
        let mut html = format!(
            r#"<div class="tools"><label>{} <select name="range" data-gadget-action="date-range">"#,
            escape_html(&self.messages.period)
        );
        for range in DateRange::ALL {
            let marker = if range == selected { r#" selected="selected""# } else { "" };
            html.push_str(&format!(
                r#"<option value="{}"{marker}>{}</option>"#,
                range.as_str(),
                range.label()
            ));
        }
        html.push_str("</select></label></div>");
        html
    }
}

pub fn format_rating(rating: f64) -> String {
    if rating.fract() == 0.0 {
        format!("{rating:.0}")
    } else {
        rating.to_string()
    }
}

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

pub fn render_page(title: &str, endpoint: &str, content: &str) -> String {
    PAGE_HTML
        .replace("{{TITLE}}", &escape_html(title))
        .replace("{{ENDPOINT}}", &escape_html(endpoint))
        .replace("{{CONTENT}}", content)
}

const PAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}}</title>
  <style>
    body {
      margin: 0;
      padding: 6px;
      font-family: "Trebuchet MS", sans-serif;
      font-size: 13px;
      color: #2b2a28;
    }

    .likeStatus {
      display: flex;
      align-items: center;
      gap: 8px;
    }

    .likeIcon {
      cursor: pointer;
    }

    .tools {
      margin-bottom: 8px;
    }

    .floatR {
      float: right;
    }

    .clear {
      clear: both;
    }

    table.dataList {
      width: 100%;
      border-collapse: collapse;
    }

    table.dataList th {
      text-align: left;
      border-bottom: 1px solid #ddd;
    }

    table.dataList td {
      padding: 4px 6px;
      vertical-align: middle;
    }

    .iconColumn {
      width: 20px;
    }
  </style>
</head>
<body>
  <div id="content" data-endpoint="{{ENDPOINT}}">{{CONTENT}}</div>

  <script>
    const content = document.getElementById('content');
    const endpoint = content.dataset.endpoint;
    const opened = new Set();

    const adjustHeight = () => {
      if (window.parent !== window) {
        window.parent.postMessage({ type: 'gadget-resize', height: document.body.scrollHeight }, '*');
      }
    };

    const send = async (action, body) => {
      const res = await fetch(`${endpoint}/${action}`, {
        method: 'POST',
        headers: { 'content-type': 'application/x-www-form-urlencoded' },
        body: new URLSearchParams(body)
      });
      if (!res.ok) {
        return;
      }
      content.innerHTML = await res.text();
      opened.forEach((id) => {
        const panel = document.getElementById(id);
        if (panel) {
          panel.style.display = '';
        }
      });
      if (res.headers.get('x-gadget-adjust-height')) {
        adjustHeight();
      }
    };

    content.addEventListener('click', (event) => {
      const toggle = event.target.closest('[data-gadget-toggle]');
      if (toggle) {
        event.preventDefault();
        const panel = document.getElementById(toggle.dataset.gadgetToggle);
        if (panel) {
          const show = panel.style.display === 'none';
          panel.style.display = show ? '' : 'none';
          if (show) {
            opened.add(panel.id);
          } else {
            opened.delete(panel.id);
          }
          adjustHeight();
        }
        return;
      }
      const target = event.target.closest('[data-gadget-action="toggle"]');
      if (target) {
        send('toggle', {});
      }
    });

    content.addEventListener('change', (event) => {
      const target = event.target.closest('select[data-gadget-action]');
      if (target) {
        send(target.dataset.gadgetAction, { [target.name]: target.value });
      }
    });

    adjustHeight();
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocumentEntity, DocumentProperties};

    fn presentation() -> Presentation {
        Presentation::new("/nuxeo/")
    }

    fn status(user_like_status: i32, likes_count: u64) -> LikeStatus {
        LikeStatus {
            user_like_status,
            likes_count,
        }
    }

    #[test]
    fn single_like_by_viewer_has_no_count() {
        let ui = presentation();
        assert_eq!(ui.like_label(&status(1, 1)), "You liked this document.");
        let html = ui.render_like_status(&status(1, 1));
        assert!(html.contains(r#"src="/nuxeo/icons/vote_up_active.png""#));
        assert!(html.contains(r#"title="You liked this document.""#));
    }

    #[test]
    fn viewer_and_others_counts_the_others() {
        let ui = presentation();
        assert_eq!(
            ui.like_label(&status(1, 5)),
            "You and 4 other(s) liked this document."
        );
        assert!(ui.render_like_status(&status(1, 5)).contains("You and 4 other(s)"));
    }

    #[test]
    fn not_liked_prompts_the_viewer() {
        let ui = presentation();
        let html = ui.render_like_status(&status(0, 3));
        assert!(html.contains("vote_up_unactive.png"));
        assert!(html.contains("3 people liked this document. What about you?"));
        assert!(html.contains(r#"<span class="likesCount">3 people liked this document.</span>"#));
    }

    #[test]
    fn rendering_is_stable_for_the_same_status() {
        let ui = presentation();
        assert_eq!(
            ui.render_like_status(&status(1, 2)),
            ui.render_like_status(&status(1, 2))
        );
    }

    #[test]
    fn rows_follow_the_item_tag() {
        let ui = presentation();
        let items = vec![
            RankedObject::Document(RankedDocument {
                rating: 3.0,
                has_user_liked: true,
                url: Some("/nuxeo/nxdoc/default/1".into()),
                document: Some(DocumentEntity {
                    properties: DocumentProperties {
                        icon: Some("/icons/file.gif".into()),
                        title: Some("Q3 <draft>".into()),
                        creator: Some("bob".into()),
                    },
                }),
            }),
            RankedObject::Minimessage(RankedMessage {
                rating: 1.0,
                has_user_liked: false,
                message: "see <a href=\"http://x\">http://x</a>".into(),
                actor: "alice".into(),
            }),
            RankedObject::Unknown,
        ];
        let html = ui.render_leaderboard(&items);
        assert_eq!(html.matches("<tr><td>").count(), 2);
        assert!(html.contains(r#"<img src="/nuxeo/icons/file.gif"/>"#));
        assert!(html.contains("Q3 &lt;draft&gt;"));
        assert!(
            html.contains(r#"<img class="liked" src="/nuxeo/icons/vote_up_active.png"/>3</td>"#)
        );
        assert!(html.contains(r#"<img src="/nuxeo/icons/activity_message.png"/>"#));
        assert!(html.contains(r#"<a href="http://x">http://x</a>"#));
        assert!(
            html.contains(r#"<img class="rated" src="/nuxeo/icons/vote_up_active2.png"/>1</td>"#)
        );
        assert_eq!(ui.render_row(&RankedObject::Unknown), None);
    }

    #[test]
    fn scope_selector_marks_the_selection() {
        let ui = presentation();
        let options = vec![
            DomainOption {
                path: "/default-domain".into(),
                title: "Default".into(),
            },
            DomainOption {
                path: "/demo".into(),
                title: "Demo".into(),
            },
        ];
        let html = ui.render_scope_selector(&options, Some("/demo"));
        assert!(html.contains(r#"<option value="/demo" selected="selected">Demo</option>"#));
        assert!(html.contains(r#"<option value="/default-domain">Default</option>"#));
    }

    #[test]
    fn scope_selector_starts_behind_the_settings_link() {
        let ui = presentation();
        let options = vec![DomainOption {
            path: "/demo".into(),
            title: "Demo".into(),
        }];
        let html = ui.render_scope_selector(&options, None);
        assert!(html.starts_with(r#"<div class="tools"><div class="floatR" id="contextButton">"#));
        assert!(
            html.contains(r#"data-gadget-toggle="domains" title="Edit context settings">Settings</a>"#)
        );
        assert!(html.contains(r#"<div id="domains" style="display: none;"><label>Domain <select"#));
        assert!(html.ends_with(r#"</select></label></div><div class="clear"></div></div>"#));
    }

    #[test]
    fn ratings_print_without_trailing_zeroes() {
        assert_eq!(format_rating(12.0), "12");
        assert_eq!(format_rating(2.5), "2.5");
    }
}
