//! Alert message composition.

use chrono::{DateTime, Duration, Utc};

use crate::health::Verdict;

/// A composed alert, ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertMessage {
    pub subject: String,
    pub html: String,
}

/// Build the "service is down" email for a failing verdict.
pub fn compose(verdict: &Verdict, now: DateTime<Utc>, cooldown: Duration) -> AlertMessage {
    let name = escape(&verdict.name);
    let subject = format!("⚠️ ALERT: {} is DOWN", verdict.name);

    let html = format!(
        r#"<html>
<body style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <div style="background-color: #ff4444; color: white; padding: 20px; border-radius: 5px;">
    <h2>🚨 Service Alert</h2>
  </div>
  <div style="padding: 20px; background-color: #f5f5f5; margin-top: 10px; border-radius: 5px;">
    <h3>{name} ({description}) is DOWN</h3>
    <p><strong>Time:</strong> {time}</p>
    <p><strong>Status:</strong> {status}</p>
    <p><strong>Health:</strong> {health}</p>
    <p><strong>Error:</strong> {detail}</p>
  </div>
  <div style="padding: 20px; margin-top: 10px;">
    <p><strong>Recommended Actions:</strong></p>
    <ul>
      <li>Check service logs: <code>docker logs {name}</code></li>
      <li>Restart service: <code>docker restart {name}</code></li>
      <li>View all services: <code>docker ps -a</code></li>
    </ul>
    <p style="color: #666; font-size: 12px; margin-top: 30px;">
      This alert was sent by HealthWatch monitoring service.<br>
      Alerts are throttled to once per {cooldown} minutes per service.
    </p>
  </div>
</body>
</html>
"#,
        name = name,
        description = escape(&verdict.description),
        time = now.format("%Y-%m-%d %H:%M:%S UTC"),
        status = escape(&verdict.status),
        health = escape(&verdict.health),
        detail = escape(&verdict.failure_detail()),
        cooldown = cooldown.num_minutes(),
    );

    AlertMessage { subject, html }
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
