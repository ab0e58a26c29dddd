//! Reactive Page
//!
//! The dashboard page is a tiny state machine: unselected until the client
//! picks an identifier, then selected(identifier). Selector changes are
//! modeled as explicit triggers dispatched through a rule table rather than
//! callbacks registered implicitly by a UI framework. The single standard
//! rule re-fetches the store and rebuilds the chart on every dispatch,
//! including re-selection of the current value.

use futures_util::future::BoxFuture;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::chart::{self, ChartDescriptor};
use crate::store::{MeasurementSource, StoreError};

/// A page trigger carrying its event payload
#[derive(Debug, Clone, PartialEq)]
pub enum Trigger {
    /// The selector control changed (or was re-set to the same value)
    SelectorChanged { identifier: String },
}

/// Discriminant used as the rule-table key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerKind {
    SelectorChanged,
}

impl Trigger {
    pub fn kind(&self) -> TriggerKind {
        match self {
            Trigger::SelectorChanged { .. } => TriggerKind::SelectorChanged,
        }
    }
}

/// Effect produced by a rule
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Replace the chart placeholder's content with a new descriptor
    ReplaceChart(ChartDescriptor),
}

/// Errors surfaced by rule dispatch
#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("No rule registered for trigger {0:?}")]
    Unhandled(TriggerKind),
}

/// Async handler invoked when its trigger fires
pub type RuleHandler =
    Arc<dyn Fn(Trigger) -> BoxFuture<'static, Result<Effect, PageError>> + Send + Sync>;

/// Table mapping triggers to handlers
///
/// Registration is explicit; dispatch looks the handler up by trigger kind
/// and runs it to completion before the next dispatch for that client.
#[derive(Default)]
pub struct RuleTable {
    rules: HashMap<TriggerKind, RuleHandler>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Register a handler for a trigger kind, replacing any previous one
    pub fn register(&mut self, kind: TriggerKind, handler: RuleHandler) {
        self.rules.insert(kind, handler);
    }

    /// Dispatch a trigger to its registered handler
    pub async fn dispatch(&self, trigger: Trigger) -> Result<Effect, PageError> {
        let kind = trigger.kind();
        let handler = self
            .rules
            .get(&kind)
            .ok_or(PageError::Unhandled(kind))?;
        handler(trigger).await
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Build the standard rule set for the dashboard
///
/// One rule: SelectorChanged -> fetch, filter, ReplaceChart. Failures from
/// the fetch propagate so the caller surfaces a visible error instead of an
/// empty chart.
pub fn standard_rules(source: Arc<dyn MeasurementSource>) -> RuleTable {
    let mut table = RuleTable::new();

    table.register(
        TriggerKind::SelectorChanged,
        Arc::new(move |trigger| -> BoxFuture<'static, Result<Effect, PageError>> {
            let source = Arc::clone(&source);
            Box::pin(async move {
                let Trigger::SelectorChanged { identifier } = trigger;
                let rows = source.fetch_daily_averages().await?;
                Ok(Effect::ReplaceChart(chart::build(&rows, &identifier)))
            })
        }),
    );

    table
}

/// Render the static page shell
///
/// Layout only: title, selector control, chart placeholder. The embedded
/// script connects the push channel, fills the dropdown on update-dropdown
/// events, and re-fetches the chart on selector changes.
pub fn render_shell() -> String {
    SHELL_HTML.to_string()
}

const SHELL_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Weight Measurements Dashboard</title>
  <style>
    body {
      margin: 0;
      min-height: 100vh;
      background: #f4f6f8;
      color: #21303c;
      font-family: "Segoe UI", "Helvetica Neue", sans-serif;
      display: grid;
      place-items: start center;
      padding: 32px 18px;
    }

    .app {
      width: min(900px, 100%);
      background: #ffffff;
      border-radius: 12px;
      box-shadow: 0 10px 30px rgba(33, 48, 60, 0.12);
      padding: 28px;
      display: grid;
      gap: 20px;
    }

    h1 {
      margin: 0;
      font-size: 1.6rem;
    }

    .controls {
      display: flex;
      gap: 12px;
      align-items: center;
    }

    select {
      flex: 1;
      padding: 8px 10px;
      font-size: 1rem;
      border: 1px solid #c5cdd4;
      border-radius: 6px;
    }

    button {
      padding: 8px 16px;
      font-size: 0.95rem;
      border: none;
      border-radius: 6px;
      background: #2f6fed;
      color: white;
      cursor: pointer;
    }

    button:hover {
      background: #2459c4;
    }

    #chart-title {
      margin: 0;
      font-size: 1.05rem;
      color: #52616c;
    }

    #chart {
      width: 100%;
      height: 360px;
      border: 1px solid #e1e6ea;
      border-radius: 8px;
      background: #fcfdfe;
    }

    #status {
      min-height: 1.2em;
      font-size: 0.9rem;
      color: #b02a37;
    }
  </style>
</head>
<body>
  <div class="app">
    <h1>Weight Measurements Dashboard</h1>
    <div class="controls">
      <select id="identifier-dropdown">
        <option value="" disabled selected>Select an identifier</option>
      </select>
      <button id="refresh">Refresh</button>
    </div>
    <p id="chart-title"></p>
    <canvas id="chart" width="860" height="360"></canvas>
    <div id="status"></div>
  </div>

  <script>
    const dropdown = document.getElementById('identifier-dropdown');
    const status = document.getElementById('status');
    const chartTitle = document.getElementById('chart-title');
    const canvas = document.getElementById('chart');
    const ctx = canvas.getContext('2d');

    const wsProto = location.protocol === 'https:' ? 'wss' : 'ws';
    const ws = new WebSocket(`${wsProto}://${location.host}/api/v1/ws`);

    ws.onmessage = (event) => {
      const msg = JSON.parse(event.data);
      if (msg.type === 'update-dropdown') {
        fillDropdown(msg.identifiers);
        status.textContent = '';
      } else if (msg.type === 'error') {
        status.textContent = msg.message;
      }
    };

    ws.onclose = () => {
      status.textContent = 'Push channel disconnected';
    };

    document.getElementById('refresh').onclick = () => {
      if (ws.readyState === WebSocket.OPEN) {
        ws.send(JSON.stringify({ type: 'refresh-data' }));
      }
    };

    function fillDropdown(identifiers) {
      const current = dropdown.value;
      while (dropdown.options.length > 1) {
        dropdown.remove(1);
      }
      for (const id of identifiers) {
        const option = document.createElement('option');
        option.value = id;
        option.textContent = id;
        dropdown.appendChild(option);
      }
      if (identifiers.includes(current)) {
        dropdown.value = current;
      }
    }

    dropdown.onchange = async () => {
      const id = dropdown.value;
      if (!id) return;
      try {
        const resp = await fetch(`/api/v1/chart/${encodeURIComponent(id)}`);
        if (!resp.ok) {
          const body = await resp.json().catch(() => null);
          status.textContent = body && body.error
            ? body.error.message
            : `Chart request failed (${resp.status})`;
          return;
        }
        status.textContent = '';
        drawChart(await resp.json());
      } catch (err) {
        status.textContent = `Chart request failed: ${err}`;
      }
    };

    function drawChart(chart) {
      chartTitle.textContent = chart.title;
      ctx.clearRect(0, 0, canvas.width, canvas.height);

      const values = chart.data;
      if (values.length === 0) {
        ctx.fillStyle = '#8b959d';
        ctx.font = '14px sans-serif';
        ctx.fillText('No data for this identifier', 20, 30);
        return;
      }

      const pad = 40;
      const w = canvas.width - 2 * pad;
      const h = canvas.height - 2 * pad;
      const min = Math.min(...values);
      const max = Math.max(...values);
      const span = max - min || 1;

      const x = (i) => pad + (values.length === 1 ? w / 2 : (i / (values.length - 1)) * w);
      const y = (v) => pad + h - ((v - min) / span) * h;

      ctx.strokeStyle = '#2f6fed';
      ctx.lineWidth = 2;
      ctx.beginPath();
      values.forEach((v, i) => {
        if (i === 0) ctx.moveTo(x(i), y(v));
        else ctx.lineTo(x(i), y(v));
      });
      ctx.stroke();

      ctx.fillStyle = '#2f6fed';
      values.forEach((v, i) => {
        ctx.beginPath();
        ctx.arc(x(i), y(v), 3, 0, 2 * Math.PI);
        ctx.fill();
      });

      ctx.fillStyle = '#52616c';
      ctx.font = '11px sans-serif';
      ctx.fillText(chart.labels[0], pad, canvas.height - 12);
      const last = chart.labels[chart.labels.length - 1];
      ctx.fillText(last, canvas.width - pad - ctx.measureText(last).width, canvas.height - 12);
    }
  </script>
</body>
</html>
"#;
