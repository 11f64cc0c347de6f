use crate::forms::{FormId, ShownNotice};
use crate::models::{ActivityRecord, CustomerForm, CustomerRecord, SignupForm};
use crate::view::{CatalogView, Page, RosterView};
use tokio::time::Instant;

pub const ACTIVITIES_LOADING: &str = "<p>Loading activities...</p>";
pub const ACTIVITIES_FAILED: &str = "<p>Failed to load activities. Please try again later.</p>";
pub const CUSTOMERS_LOADING: &str = "<p>Loading customers...</p>";
pub const CUSTOMERS_FAILED: &str = "<p>Failed to load customers.</p>";
pub const CUSTOMERS_ERRORED: &str = "<p>Error loading customers.</p>";
pub const CUSTOMERS_EMPTY: &str = "<p>No customers yet.</p>";

pub fn escape_html(unsafe_text: &str) -> String {
    let mut escaped = String::with_capacity(unsafe_text.len());
    for ch in unsafe_text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

pub fn render_activity_card(name: &str, record: &ActivityRecord) -> String {
    format!(
        r#"<div class="activity-card">
  <h4>{name}</h4>
  <p>{description}</p>
  <p><strong>Schedule:</strong> {schedule}</p>
  <p><strong>Availability:</strong> {spots} spots left</p>
</div>"#,
        name = escape_html(name),
        description = escape_html(&record.description),
        schedule = escape_html(&record.schedule),
        spots = record.spots_left(),
    )
}

pub fn render_activities(view: &CatalogView) -> String {
    match view {
        CatalogView::Loading => ACTIVITIES_LOADING.to_string(),
        CatalogView::Failed => ACTIVITIES_FAILED.to_string(),
        CatalogView::Loaded(catalog) => catalog
            .iter()
            .map(|(name, record)| render_activity_card(name, record))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Options generated from the catalog. The picker is rebuilt from scratch on
/// every render, so repeated loads never duplicate entries.
pub fn render_picker_options(view: &CatalogView, selected: &str) -> String {
    let CatalogView::Loaded(catalog) = view else {
        return String::new();
    };
    catalog
        .names()
        .map(|name| {
            let marker = if name == selected { " selected" } else { "" };
            let name = escape_html(name);
            format!(r#"<option value="{name}"{marker}>{name}</option>"#)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_customer_entry(customer: &CustomerRecord) -> String {
    format!(
        "<li><strong>{} {} {}</strong> &mdash; {}<br/>{}, {} {} {}, {}</li>",
        escape_html(&customer.first_name),
        escape_html(customer.middle_name.as_deref().unwrap_or("")),
        escape_html(&customer.last_name),
        escape_html(&customer.dob),
        escape_html(&customer.address_line_1),
        escape_html(&customer.city),
        escape_html(&customer.zip_code),
        escape_html(&customer.state),
        escape_html(&customer.country),
    )
}

pub fn render_roster(view: &RosterView) -> String {
    match view {
        RosterView::Loading => CUSTOMERS_LOADING.to_string(),
        RosterView::Failed => CUSTOMERS_FAILED.to_string(),
        RosterView::Errored => CUSTOMERS_ERRORED.to_string(),
        RosterView::Empty => CUSTOMERS_EMPTY.to_string(),
        RosterView::Listed(customers) => {
            let entries = customers
                .iter()
                .map(render_customer_entry)
                .collect::<Vec<_>>()
                .join("\n");
            format!("<ul>\n{entries}\n</ul>")
        }
    }
}

pub fn render_notice(form: FormId, shown: Option<&ShownNotice>, now: Instant) -> String {
    let id = form.notice_element_id();
    match shown {
        Some(shown) if shown.visible => format!(
            r#"<div id="{id}" class="{class}" data-hide-after-ms="{remaining}">{text}</div>"#,
            class = shown.notice.kind.css_class(),
            remaining = shown.expires_at.saturating_duration_since(now).as_millis(),
            text = escape_html(&shown.notice.text),
        ),
        Some(shown) => format!(
            r#"<div id="{id}" class="{class} hidden">{text}</div>"#,
            class = shown.notice.kind.css_class(),
            text = escape_html(&shown.notice.text),
        ),
        None => format!(r#"<div id="{id}" class="hidden"></div>"#),
    }
}

pub fn render_index(page: &Page, now: Instant) -> String {
    let signup: &SignupForm = &page.signup.draft;
    let customer: &CustomerForm = &page.customer.draft;

    fill_template(INDEX_HTML, |key| {
        let value = match key {
            "ACTIVITIES" => render_activities(&page.catalog),
            "OPTIONS" => render_picker_options(&page.catalog, &signup.activity),
            "EMAIL" => escape_html(&signup.email),
            "MESSAGE" => render_notice(FormId::Signup, page.signup.status.notice(), now),
            "FIRST_NAME" => escape_html(&customer.first_name),
            "MIDDLE_NAME" => escape_html(&customer.middle_name),
            "LAST_NAME" => escape_html(&customer.last_name),
            "DOB" => escape_html(&customer.dob),
            "ADDRESS_LINE_1" => escape_html(&customer.address_line_1),
            "ZIP_CODE" => escape_html(&customer.zip_code),
            "CITY" => escape_html(&customer.city),
            "STATE" => escape_html(&customer.state),
            "COUNTRY" => escape_html(&customer.country),
            "CUSTOMER_MESSAGE" => {
                render_notice(FormId::Customer, page.customer.status.notice(), now)
            }
            "REFRESH" if page.refresh_control => REFRESH_CONTROL.to_string(),
            "REFRESH" => String::new(),
            "CUSTOMERS" => render_roster(&page.roster),
            _ => return None,
        };
        Some(value)
    })
}

/// Substitutes `{{KEY}}` placeholders in one pass, so rendered values are
/// never scanned for further placeholders. Unknown keys are left as written.
fn fill_template(template: &str, value_for: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(template.len() * 2);
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            rest = &rest[start..];
            break;
        };
        match value_for(&after[..end]) {
            Some(value) => out.push_str(&value),
            None => out.push_str(&rest[start..start + end + 4]),
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

const REFRESH_CONTROL: &str =
    r#"<a id="refresh-customers" class="refresh" href="/">Refresh list</a>"#;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Mergington High School Activities</title>
  <style>
    :root {
      --bg: #f4f6fb;
      --ink: #1f2a44;
      --accent: #3f51b5;
      --card: #ffffff;
      --ok: #2d7a4b;
      --bad: #c63b2b;
      --shadow: 0 16px 40px rgba(31, 42, 68, 0.12);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Trebuchet MS", Arial, sans-serif;
    }

    header {
      background: var(--accent);
      color: white;
      text-align: center;
      padding: 24px 16px;
    }

    header h1 {
      margin: 0;
    }

    main {
      width: min(1080px, 100%);
      margin: 0 auto;
      padding: 24px 16px 48px;
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(320px, 1fr));
      gap: 24px;
    }

    section {
      background: var(--card);
      border-radius: 14px;
      box-shadow: var(--shadow);
      padding: 20px;
    }

    .activity-card {
      border: 1px solid rgba(31, 42, 68, 0.1);
      border-radius: 10px;
      padding: 12px 14px;
      margin-bottom: 12px;
    }

    .activity-card h4 {
      margin: 0 0 6px;
      color: var(--accent);
    }

    .form-group {
      display: grid;
      gap: 4px;
      margin-bottom: 12px;
    }

    input,
    select {
      padding: 8px 10px;
      border-radius: 8px;
      border: 1px solid rgba(31, 42, 68, 0.25);
      font-size: 1rem;
    }

    button {
      border: none;
      border-radius: 8px;
      padding: 10px 16px;
      background: var(--accent);
      color: white;
      font-weight: 600;
      cursor: pointer;
    }

    .success,
    .error {
      margin-top: 14px;
      padding: 10px 12px;
      border-radius: 8px;
    }

    .success {
      background: #e3f3e9;
      color: var(--ok);
    }

    .error {
      background: #fbe4e1;
      color: var(--bad);
    }

    .hidden {
      display: none;
    }

    #customer-list ul {
      padding-left: 18px;
    }

    #customer-list li {
      margin-bottom: 10px;
    }

    .refresh {
      display: inline-block;
      margin-bottom: 12px;
      color: var(--accent);
    }
  </style>
</head>
<body>
  <header>
    <h1>Mergington High School</h1>
    <h2>Extracurricular Activities</h2>
  </header>

  <main>
    <section id="activities-container">
      <h3>Available Activities</h3>
      <div id="activities-list">
{{ACTIVITIES}}
      </div>
    </section>

    <section id="signup-container">
      <h3>Sign Up for an Activity</h3>
      <form id="signup-form" method="post" action="/signup">
        <div class="form-group">
          <label for="email">Student Email:</label>
          <input type="email" id="email" name="email" required placeholder="your-email@mergington.edu" value="{{EMAIL}}" />
        </div>
        <div class="form-group">
          <label for="activity">Select Activity:</label>
          <select id="activity" name="activity" required>
            <option value="">-- Select an activity --</option>
{{OPTIONS}}
          </select>
        </div>
        <button type="submit">Sign Up</button>
      </form>
      {{MESSAGE}}
    </section>

    <section id="customer-container">
      <h3>Add a Customer</h3>
      <form id="customer-form" method="post" action="/customers">
        <div class="form-group">
          <label for="first_name">First name:</label>
          <input type="text" id="first_name" name="first_name" required value="{{FIRST_NAME}}" />
        </div>
        <div class="form-group">
          <label for="middle_name">Middle name:</label>
          <input type="text" id="middle_name" name="middle_name" value="{{MIDDLE_NAME}}" />
        </div>
        <div class="form-group">
          <label for="last_name">Last name:</label>
          <input type="text" id="last_name" name="last_name" required value="{{LAST_NAME}}" />
        </div>
        <div class="form-group">
          <label for="dob">Date of birth:</label>
          <input type="date" id="dob" name="dob" required value="{{DOB}}" />
        </div>
        <div class="form-group">
          <label for="address_line_1">Address:</label>
          <input type="text" id="address_line_1" name="address_line_1" required value="{{ADDRESS_LINE_1}}" />
        </div>
        <div class="form-group">
          <label for="zip_code">Zip code:</label>
          <input type="text" id="zip_code" name="zip_code" required value="{{ZIP_CODE}}" />
        </div>
        <div class="form-group">
          <label for="city">City:</label>
          <input type="text" id="city" name="city" required value="{{CITY}}" />
        </div>
        <div class="form-group">
          <label for="state">State:</label>
          <input type="text" id="state" name="state" required value="{{STATE}}" />
        </div>
        <div class="form-group">
          <label for="country">Country:</label>
          <input type="text" id="country" name="country" required value="{{COUNTRY}}" />
        </div>
        <button type="submit">Create Customer</button>
      </form>
      {{CUSTOMER_MESSAGE}}
    </section>

    <section id="customers-container">
      <h3>Customers</h3>
      {{REFRESH}}
      <div id="customer-list">
{{CUSTOMERS}}
      </div>
    </section>
  </main>

  <script>
    document.querySelectorAll('[data-hide-after-ms]').forEach((el) => {
      const delay = Number(el.dataset.hideAfterMs) || 0;
      setTimeout(() => el.classList.add('hidden'), delay);
    });

    const refreshControl = document.getElementById('refresh-customers');
    if (refreshControl) {
      refreshControl.addEventListener('click', async (event) => {
        event.preventDefault();
        const list = document.getElementById('customer-list');
        try {
          const res = await fetch('/fragments/customers');
          list.innerHTML = await res.text();
        } catch (err) {
          list.innerHTML = '<p>Error loading customers.</p>';
          console.error('Error fetching customers:', err);
        }
      });
    }
  </script>
</body>
</html>
"#;
