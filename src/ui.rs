use chrono::NaiveDate;

pub fn render_dashboard(client_id: &str, today: NaiveDate) -> String {
    DASHBOARD_HTML
        .replace("{{CLIENT}}", &escape_html(client_id))
        .replace("{{TODAY}}", &today.format("%Y-%m-%d").to_string())
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Client Nutrition</title>
  <style>
    :root {
      --bg: #f3f6f1;
      --ink: #23302a;
      --muted: #6c7a72;
      --card: #ffffff;
      --calories: #e4572e;
      --protein: #2e86ab;
      --carbs: #f3a712;
      --fats: #6a4c93;
      --shadow: 0 18px 48px rgba(35, 48, 42, 0.12);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Inter", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: start center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(920px, 100%);
      background: var(--card);
      border-radius: 24px;
      box-shadow: var(--shadow);
      padding: 32px;
      display: grid;
      gap: 24px;
    }

    h1 {
      margin: 0;
      font-size: clamp(1.6rem, 3vw, 2.2rem);
    }

    .subtitle {
      margin: 4px 0 0;
      color: var(--muted);
    }

    .toolbar {
      display: flex;
      flex-wrap: wrap;
      gap: 12px;
      align-items: center;
      justify-content: space-between;
    }

    .toggles label {
      margin-right: 12px;
      font-weight: 600;
    }

    button {
      border: none;
      border-radius: 999px;
      padding: 10px 16px;
      font-weight: 600;
      cursor: pointer;
      background: #e6ece7;
      color: var(--ink);
    }

    .chart-card {
      border: 1px solid rgba(35, 48, 42, 0.08);
      border-radius: 18px;
      padding: 12px;
    }

    .chart-grid {
      stroke: rgba(35, 48, 42, 0.08);
    }

    .chart-label {
      fill: var(--muted);
      font-size: 11px;
    }

    .chart-line {
      fill: none;
      stroke-width: 3;
    }

    table {
      width: 100%;
      border-collapse: collapse;
    }

    th, td {
      text-align: right;
      padding: 8px;
      border-bottom: 1px solid rgba(35, 48, 42, 0.08);
    }

    th:first-child, td:first-child {
      text-align: left;
    }

    form.log {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(120px, 1fr));
      gap: 10px;
    }

    form.log input {
      padding: 10px;
      border-radius: 10px;
      border: 1px solid rgba(35, 48, 42, 0.2);
    }

    .status[data-type="error"] {
      color: var(--calories);
    }

    .warning {
      color: var(--calories);
      font-weight: 600;
    }
  </style>
</head>
<body data-client="{{CLIENT}}" data-today="{{TODAY}}">
  <main class="app">
    <header>
      <h1>Nutrition: <span id="client-name">{{CLIENT}}</span></h1>
      <p class="subtitle" id="week-title">Loading week...</p>
    </header>

    <section class="toolbar">
      <div>
        <button type="button" id="prev-week">&larr; Previous</button>
        <button type="button" id="next-week">Next &rarr;</button>
      </div>
      <div class="toggles">
        <label><input type="checkbox" data-macro="calories" checked /> Calories</label>
        <label><input type="checkbox" data-macro="protein" checked /> Protein</label>
        <label><input type="checkbox" data-macro="carbs" checked /> Carbs</label>
        <label><input type="checkbox" data-macro="fats" checked /> Fat</label>
      </div>
      <select id="policy">
        <option value="zero_fill">Average over 7 days</option>
        <option value="exclude">Average over logged days</option>
      </select>
    </section>

    <section class="chart-card">
      <svg id="chart" viewBox="0 0 600 260" aria-label="Weekly macros" role="img"></svg>
    </section>

    <p class="warning" id="failed-days" hidden></p>

    <section>
      <table>
        <thead>
          <tr><th>Macro</th><th>Week total</th><th>Daily average</th></tr>
        </thead>
        <tbody id="stats-body"></tbody>
      </table>
    </section>

    <section>
      <h2>Log food</h2>
      <form class="log" id="log-form">
        <input name="name" placeholder="Food" required />
        <input name="calories" placeholder="Calories" inputmode="decimal" />
        <input name="protein" placeholder="Protein (g)" inputmode="decimal" />
        <input name="carbs" placeholder="Carbs (g)" inputmode="decimal" />
        <input name="fats" placeholder="Fat (g)" inputmode="decimal" />
        <input name="date" type="date" />
        <button type="submit">Save</button>
      </form>
    </section>

    <div class="status" id="status"></div>
  </main>

  <script>
    const client = document.body.dataset.client;
    const chartEl = document.getElementById('chart');
    const titleEl = document.getElementById('week-title');
    const statsBody = document.getElementById('stats-body');
    const failedEl = document.getElementById('failed-days');
    const statusEl = document.getElementById('status');
    const policyEl = document.getElementById('policy');
    const toggles = Array.from(document.querySelectorAll('[data-macro]'));
    const colors = { calories: 'var(--calories)', protein: 'var(--protein)', carbs: 'var(--carbs)', fats: 'var(--fats)' };
    const labels = { calories: 'Calories', protein: 'Protein', carbs: 'Carbs', fats: 'Fat' };

    let pivot = document.body.dataset.today;
    let report = null;

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const fmt = (value) => (Math.round(value * 10) / 10).toString();

    const renderChart = (chart) => {
      const width = 600;
      const height = 260;
      const padX = 48;
      const padY = 34;
      const top = 20;
      const values = chart.series.flatMap((s) => s.data);
      if (!values.length) {
        chartEl.innerHTML = '<text class="chart-label" x="50%" y="50%" text-anchor="middle">No macros selected</text>';
        return;
      }
      const max = Math.max(1, ...values);
      const xStep = (width - padX * 2) / (chart.labels.length - 1);
      const x = (i) => padX + i * xStep;
      const y = (v) => height - padY - (v / max) * (height - top - padY);

      let grid = '';
      for (let i = 0; i <= 4; i += 1) {
        const v = (max * i) / 4;
        grid += `<line class="chart-grid" x1="${padX}" y1="${y(v)}" x2="${width - padX}" y2="${y(v)}" />`;
        grid += `<text class="chart-label" x="${padX - 8}" y="${y(v) + 4}" text-anchor="end">${fmt(v)}</text>`;
      }
      const xLabels = chart.labels
        .map((label, i) => `<text class="chart-label" x="${x(i)}" y="${height - padY + 18}" text-anchor="middle">${label}</text>`)
        .join('');
      const lines = chart.series
        .map((s) => {
          const d = s.data.map((v, i) => `${i === 0 ? 'M' : 'L'} ${x(i).toFixed(1)} ${y(v).toFixed(1)}`).join(' ');
          return `<path class="chart-line" stroke="${colors[s.key]}" d="${d}" />`;
        })
        .join('');
      chartEl.innerHTML = `${grid}${lines}${xLabels}`;
    };

    const renderStats = (stats) => {
      statsBody.innerHTML = Object.keys(labels)
        .map((key) => `<tr><td>${labels[key]}</td><td>${fmt(stats.total[key])}</td><td>${fmt(stats.average[key])}</td></tr>`)
        .join('');
    };

    const render = () => {
      titleEl.textContent = `${report.week}: ${report.start_date} to ${report.end_date} (${report.stats.days_with_data} days logged)`;
      renderChart(report.chart);
      renderStats(report.stats);
      if (report.failed_days.length) {
        failedEl.hidden = false;
        failedEl.textContent = `Could not load: ${report.failed_days.join(', ')}. Those days show as zero.`;
      } else {
        failedEl.hidden = true;
      }
    };

    const loadWeek = async () => {
      const params = new URLSearchParams({ date: pivot, policy: policyEl.value });
      toggles.forEach((t) => params.set(t.dataset.macro, String(t.checked)));
      const res = await fetch(`/api/clients/${encodeURIComponent(client)}/nutrition/week?${params}`);
      if (res.status === 409) {
        return;
      }
      if (!res.ok) {
        throw new Error(await res.text() || 'Unable to load week');
      }
      report = await res.json();
      render();
    };

    const reload = () => loadWeek().catch((err) => setStatus(err.message, 'error'));

    document.getElementById('prev-week').addEventListener('click', () => {
      if (report) {
        pivot = report.prev_week;
        reload();
      }
    });

    document.getElementById('next-week').addEventListener('click', () => {
      if (report) {
        pivot = report.next_week;
        reload();
      }
    });

    toggles.forEach((t) => t.addEventListener('change', reload));
    policyEl.addEventListener('change', reload);

    document.getElementById('log-form').addEventListener('submit', async (event) => {
      event.preventDefault();
      const form = new FormData(event.target);
      const body = { name: form.get('name') };
      ['calories', 'protein', 'carbs', 'fats', 'date'].forEach((key) => {
        const value = form.get(key);
        if (value) {
          body[key] = value;
        }
      });
      setStatus('Saving...', 'info');
      try {
        const res = await fetch(`/api/clients/${encodeURIComponent(client)}/foods`, {
          method: 'POST',
          headers: { 'content-type': 'application/json' },
          body: JSON.stringify(body)
        });
        if (!res.ok) {
          throw new Error(await res.text() || 'Request failed');
        }
        event.target.reset();
        setStatus('Saved', 'ok');
        await loadWeek();
      } catch (err) {
        setStatus(err.message, 'error');
      }
    });

    reload();
  </script>
</body>
</html>
"#;
