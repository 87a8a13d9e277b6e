pub fn render_index(refresh_interval_secs: u64, top_pool_size: u32) -> String {
    INDEX_HTML
        .replace("{{REFRESH_SECS}}", &refresh_interval_secs.to_string())
        .replace("{{POOL}}", &top_pool_size.to_string())
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>YouTube Analytics Dashboard</title>
  <style>
    :root {
      --bg: #0e1117;
      --panel: #161a23;
      --panel-2: #1d2230;
      --ink: #f3f4f6;
      --muted: #9aa3b2;
      --accent: #ff0000;
      --accent-dark: #cc0000;
      --good: #3ecf8e;
      --bad: #ff6b6b;
      --line: rgba(255, 255, 255, 0.08);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Inter", "Segoe UI", "Helvetica Neue", sans-serif;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(1100px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 28px;
    }

    header {
      display: flex;
      flex-wrap: wrap;
      justify-content: space-between;
      align-items: flex-end;
      gap: 16px;
    }

    h1 {
      margin: 0;
      font-size: clamp(1.8rem, 4vw, 2.6rem);
    }

    h2 {
      margin: 0 0 12px;
      font-size: 1.3rem;
    }

    .subtitle {
      margin: 6px 0 0;
      color: var(--muted);
    }

    .btn {
      appearance: none;
      border: none;
      border-radius: 10px;
      padding: 8px 16px;
      font-size: 0.95rem;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: white;
      text-decoration: none;
      display: inline-flex;
      align-items: center;
      gap: 8px;
    }

    .btn:hover {
      background: var(--accent-dark);
    }

    .btn[disabled] {
      opacity: 0.6;
      cursor: progress;
    }

    .btn.ghost {
      background: var(--panel-2);
      border: 1px solid var(--line);
    }

    section.card {
      background: var(--panel);
      border: 1px solid var(--line);
      border-radius: 16px;
      padding: 20px;
    }

    .cards {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
      gap: 16px;
    }

    .metric {
      background: var(--panel-2);
      border-radius: 14px;
      padding: 16px;
      display: grid;
      gap: 6px;
    }

    .metric .label {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: var(--muted);
    }

    .metric .value {
      font-size: 1.8rem;
      font-weight: 700;
    }

    .delta {
      font-size: 0.85rem;
      color: var(--muted);
    }

    .delta.up {
      color: var(--good);
    }

    .delta.down {
      color: var(--bad);
    }

    .chart-header {
      display: flex;
      flex-wrap: wrap;
      justify-content: space-between;
      align-items: center;
      gap: 12px;
      margin-bottom: 12px;
    }

    .tabs {
      display: flex;
      gap: 6px;
      padding: 4px;
      background: var(--panel-2);
      border-radius: 999px;
    }

    .tab {
      background: transparent;
      border: none;
      border-radius: 999px;
      padding: 6px 14px;
      font-weight: 600;
      color: var(--muted);
      cursor: pointer;
    }

    .tab.active {
      background: var(--accent);
      color: white;
    }

    svg.chart {
      width: 100%;
      height: 260px;
      display: block;
    }

    .chart-line {
      fill: none;
      stroke: var(--accent);
      stroke-width: 3;
    }

    .chart-point {
      fill: var(--bg);
      stroke: var(--accent);
      stroke-width: 2;
    }

    .chart-bar {
      fill: var(--accent);
    }

    .chart-grid {
      stroke: var(--line);
    }

    .chart-label {
      fill: var(--muted);
      font-size: 11px;
    }

    table {
      width: 100%;
      border-collapse: collapse;
      font-size: 0.95rem;
    }

    th,
    td {
      text-align: left;
      padding: 8px 10px;
      border-bottom: 1px solid var(--line);
    }

    th {
      color: var(--muted);
      font-weight: 600;
    }

    td.num,
    th.num {
      text-align: right;
      font-variant-numeric: tabular-nums;
    }

    .insights {
      white-space: pre-wrap;
      line-height: 1.5;
      background: var(--panel-2);
      border-radius: 12px;
      padding: 16px;
      margin-top: 12px;
    }

    .status {
      min-height: 1.2em;
      color: var(--muted);
    }

    .status[data-type="error"] {
      color: var(--bad);
    }

    .status[data-type="ok"] {
      color: var(--good);
    }

    .hidden {
      display: none !important;
    }

    .toolbar {
      display: flex;
      flex-wrap: wrap;
      gap: 16px;
      align-items: center;
      color: var(--muted);
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <div>
        <h1>YouTube Analytics Dashboard</h1>
        <p class="subtitle">Track your channel performance and get AI-powered content strategy insights.</p>
      </div>
      <form id="reset-form" method="post" action="/account/reset">
        <button class="btn ghost" type="submit">Change YouTube Account</button>
      </form>
    </header>

    <div class="status" id="status"></div>

    <section id="signin" class="card hidden">
      <h2>Sign in required</h2>
      <p class="subtitle">Connect a YouTube account to load channel statistics.</p>
      <p><a class="btn" href="/auth/login">Sign in with Google</a></p>
    </section>

    <div id="content" class="app hidden">
      <section class="card">
        <h2 id="channel-name">Channel</h2>
        <div class="cards">
          <div class="metric">
            <span class="label">Subscribers</span>
            <span class="value" id="subs">--</span>
            <span class="delta" id="subs-delta"></span>
          </div>
          <div class="metric">
            <span class="label">Total Views</span>
            <span class="value" id="views">--</span>
            <span class="delta" id="views-delta"></span>
          </div>
          <div class="metric">
            <span class="label">Videos</span>
            <span class="value" id="videos">--</span>
            <span class="delta" id="videos-delta"></span>
          </div>
        </div>
      </section>

      <section class="card">
        <div class="chart-header">
          <div>
            <h2>Channel Growth Over Time</h2>
            <p class="subtitle" id="trend-subtitle">One snapshot per day.</p>
          </div>
          <div class="tabs" role="tablist">
            <button class="tab active" type="button" data-metric="subscribers" role="tab" aria-selected="true">Subscribers</button>
            <button class="tab" type="button" data-metric="views" role="tab" aria-selected="false">Views</button>
            <button class="tab" type="button" data-metric="videos" role="tab" aria-selected="false">Videos</button>
          </div>
        </div>
        <svg id="trend-chart" class="chart" viewBox="0 0 600 260" aria-label="Channel growth chart" role="img"></svg>
        <p><a class="btn ghost" href="/api/history.csv" download="channel_history.csv">Download Channel History (CSV)</a></p>
      </section>

      <section class="card">
        <h2>Top 10 Videos (by Views)</h2>
        <p class="subtitle">Ranked among the {{POOL}} most recent uploads.</p>
        <table>
          <thead>
            <tr><th>Title</th><th class="num">Views</th><th class="num">Likes</th><th class="num">Comments</th></tr>
          </thead>
          <tbody id="top-body"></tbody>
        </table>
        <svg id="top-chart" class="chart" viewBox="0 0 600 260" aria-label="Top videos by views" role="img"></svg>
      </section>

      <section class="card">
        <h2>Latest 10 Videos</h2>
        <table>
          <thead>
            <tr><th class="num">S.No</th><th>Title</th><th>Published</th></tr>
          </thead>
          <tbody id="latest-body"></tbody>
        </table>
      </section>

      <section class="card">
        <h2>AI Insights &amp; Content Strategy</h2>
        <button class="btn" id="insights-btn" type="button">Generate AI Insights</button>
        <div class="status" id="insights-status"></div>
        <div class="insights hidden" id="insights"></div>
      </section>
    </div>

    <div class="toolbar">
      <label><input type="checkbox" id="auto-refresh" /> Auto-refresh every {{REFRESH_SECS}} seconds</label>
      <span id="updated"></span>
    </div>
  </main>

  <script>
    const REFRESH_SECS = {{REFRESH_SECS}};

    const statusEl = document.getElementById('status');
    const signinEl = document.getElementById('signin');
    const contentEl = document.getElementById('content');
    const trendChart = document.getElementById('trend-chart');
    const trendSubtitle = document.getElementById('trend-subtitle');
    const topChart = document.getElementById('top-chart');
    const topBody = document.getElementById('top-body');
    const latestBody = document.getElementById('latest-body');
    const insightsBtn = document.getElementById('insights-btn');
    const insightsStatus = document.getElementById('insights-status');
    const insightsEl = document.getElementById('insights');
    const autoRefresh = document.getElementById('auto-refresh');
    const updatedEl = document.getElementById('updated');
    const tabs = Array.from(document.querySelectorAll('.tab'));

    let trendPoints = [];
    let activeMetric = 'subscribers';
    let refreshTimer = null;

    const setStatus = (el, message, type) => {
      el.textContent = message;
      el.dataset.type = type || '';
    };

    const fmt = (value) => Number(value).toLocaleString();

    const escapeXml = (text) =>
      String(text).replace(/[&<>"']/g, (c) => ({ '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;', "'": '&#39;' }[c]));

    const shorten = (text, max) => (text.length > max ? `${text.slice(0, max - 1)}…` : text);

    const setDelta = (id, change) => {
      const el = document.getElementById(id);
      el.classList.remove('up', 'down');
      if (change === null || change === undefined) {
        el.textContent = '';
        return;
      }
      el.textContent = `${change >= 0 ? '+' : ''}${fmt(change)} since last snapshot`;
      if (change > 0) el.classList.add('up');
      if (change < 0) el.classList.add('down');
    };

    const renderLineChart = (svg, points) => {
      if (!points.length) {
        svg.innerHTML = '<text class="chart-label" x="50%" y="50%" text-anchor="middle">No history yet</text>';
        return;
      }

      const width = 600;
      const height = 260;
      const paddingX = 64;
      const paddingY = 34;
      const top = 24;

      const values = points.map((point) => point.value);
      let min = Math.min(...values);
      let max = Math.max(...values);
      if (min === max) {
        min -= 1;
        max += 1;
      }

      const range = max - min;
      const xStep = points.length > 1 ? (width - paddingX * 2) / (points.length - 1) : 0;
      const scaleY = (height - top - paddingY) / range;
      const x = (index) => (points.length > 1 ? paddingX + index * xStep : width / 2);
      const y = (value) => height - paddingY - (value - min) * scaleY;

      const path = points
        .map((point, index) => `${index === 0 ? 'M' : 'L'} ${x(index).toFixed(2)} ${y(point.value).toFixed(2)}`)
        .join(' ');

      let grid = '';
      const ticks = 4;
      for (let i = 0; i <= ticks; i += 1) {
        const value = min + (range * i) / ticks;
        const yPos = y(value);
        grid += `<line class="chart-grid" x1="${paddingX}" y1="${yPos}" x2="${width - paddingX}" y2="${yPos}" />`;
        grid += `<text class="chart-label" x="${paddingX - 10}" y="${yPos + 4}" text-anchor="end">${fmt(Math.round(value))}</text>`;
      }

      const labelEvery = Math.max(1, Math.ceil(points.length / 8));
      const xLabels = points
        .map((point, index) =>
          index % labelEvery === 0
            ? `<text class="chart-label" x="${x(index)}" y="${height - paddingY + 18}" text-anchor="middle">${escapeXml(point.label)}</text>`
            : '')
        .join('');

      const circles = points
        .map((point, index) => `<circle class="chart-point" cx="${x(index)}" cy="${y(point.value)}" r="4"><title>${escapeXml(point.label)}: ${fmt(point.value)}</title></circle>`)
        .join('');

      svg.innerHTML = `${grid}<path class="chart-line" d="${path}" />${circles}${xLabels}`;
    };

    const renderBarChart = (svg, bars) => {
      if (!bars.length) {
        svg.innerHTML = '<text class="chart-label" x="50%" y="50%" text-anchor="middle">No videos yet</text>';
        return;
      }

      const width = 600;
      const height = 260;
      const paddingX = 24;
      const bottom = 40;
      const top = 24;
      const max = Math.max(1, ...bars.map((bar) => bar.value));
      const slot = (width - paddingX * 2) / bars.length;
      const barWidth = slot * 0.7;

      svg.innerHTML = bars
        .map((bar, index) => {
          const h = ((height - top - bottom) * bar.value) / max;
          const x = paddingX + index * slot + (slot - barWidth) / 2;
          const y = height - bottom - h;
          return `
            <rect class="chart-bar" x="${x}" y="${y}" width="${barWidth}" height="${h}" rx="4"><title>${escapeXml(bar.label)}</title></rect>
            <text class="chart-label" x="${x + barWidth / 2}" y="${y - 6}" text-anchor="middle">${fmt(bar.value)}</text>
            <text class="chart-label" x="${x + barWidth / 2}" y="${height - bottom + 16}" text-anchor="middle">${escapeXml(shorten(bar.label, 10))}</text>`;
        })
        .join('');
    };

    const renderTrend = () => {
      const labels = { subscribers: 'Subscribers', views: 'Views', videos: 'Videos' };
      trendSubtitle.textContent = `${labels[activeMetric]} per daily snapshot (${trendPoints.length} days).`;
      renderLineChart(
        trendChart,
        trendPoints.map((point) => ({ label: point.date.slice(5), value: point[activeMetric] }))
      );
    };

    const fillRows = (tbody, rows) => {
      tbody.replaceChildren(
        ...rows.map((cells) => {
          const tr = document.createElement('tr');
          cells.forEach(({ text, num }) => {
            const td = document.createElement('td');
            td.textContent = text;
            if (num) td.className = 'num';
            tr.appendChild(td);
          });
          return tr;
        })
      );
    };

    const renderDashboard = (data) => {
      document.getElementById('channel-name').textContent = `Channel: ${data.channel.title}`;
      document.getElementById('subs').textContent = fmt(data.channel.subscribers);
      document.getElementById('views').textContent = fmt(data.channel.views);
      document.getElementById('videos').textContent = fmt(data.channel.videos);

      const latest = data.trend.latest;
      setDelta('subs-delta', latest ? latest.subscriber_change : null);
      setDelta('views-delta', latest ? latest.view_change : null);
      setDelta('videos-delta', latest ? latest.video_change : null);

      trendPoints = data.trend.points;
      renderTrend();

      fillRows(
        topBody,
        data.top_videos.map((video) => [
          { text: video.title },
          { text: fmt(video.views), num: true },
          { text: fmt(video.likes), num: true },
          { text: fmt(video.comments), num: true }
        ])
      );
      renderBarChart(topChart, data.top_videos.map((video) => ({ label: video.title, value: video.views })));

      fillRows(
        latestBody,
        data.latest_videos.map((video) => [
          { text: String(video.position), num: true },
          { text: video.title },
          { text: new Date(video.published_at).toLocaleString() }
        ])
      );

      updatedEl.textContent = `Updated ${new Date().toLocaleTimeString()}${data.recorded_today ? ' · snapshot saved for today' : ''}`;
    };

    const loadDashboard = async () => {
      setStatus(statusEl, 'Loading channel data...', 'info');
      const res = await fetch('/api/dashboard');
      if (res.status === 401) {
        signinEl.classList.remove('hidden');
        contentEl.classList.add('hidden');
        setStatus(statusEl, '', '');
        return;
      }
      if (!res.ok) {
        throw new Error((await res.text()) || 'Unable to load dashboard');
      }
      renderDashboard(await res.json());
      signinEl.classList.add('hidden');
      contentEl.classList.remove('hidden');
      setStatus(statusEl, '', '');
    };

    const generateInsights = async () => {
      insightsBtn.disabled = true;
      setStatus(insightsStatus, 'Generating insights... Please wait', 'info');
      try {
        const res = await fetch('/api/insights', { method: 'POST' });
        if (!res.ok) {
          throw new Error((await res.text()) || 'Insight generation failed');
        }
        const data = await res.json();
        insightsEl.textContent = data.insights;
        insightsEl.classList.remove('hidden');
        setStatus(insightsStatus, `Insights generated from ${data.video_count} videos.`, 'ok');
      } catch (err) {
        setStatus(insightsStatus, err.message, 'error');
      } finally {
        insightsBtn.disabled = false;
      }
    };

    const resetAccount = async () => {
      const res = await fetch('/api/account/reset', { method: 'POST' });
      if (!res.ok) {
        throw new Error((await res.text()) || 'Unable to clear token');
      }
      const data = await res.json();
      signinEl.classList.remove('hidden');
      contentEl.classList.add('hidden');
      setStatus(statusEl, data.message, 'ok');
    };

    const setAutoRefresh = (enabled) => {
      if (refreshTimer) {
        clearInterval(refreshTimer);
        refreshTimer = null;
      }
      if (enabled) {
        refreshTimer = setInterval(() => {
          loadDashboard().catch((err) => setStatus(statusEl, err.message, 'error'));
        }, REFRESH_SECS * 1000);
      }
      localStorage.setItem('autoRefresh', enabled ? '1' : '0');
    };

    tabs.forEach((button) => {
      button.addEventListener('click', () => {
        activeMetric = button.dataset.metric;
        tabs.forEach((tab) => {
          const isActive = tab === button;
          tab.classList.toggle('active', isActive);
          tab.setAttribute('aria-selected', String(isActive));
        });
        renderTrend();
      });
    });

    document.getElementById('reset-form').addEventListener('submit', (event) => {
      event.preventDefault();
      resetAccount().catch((err) => setStatus(statusEl, err.message, 'error'));
    });

    insightsBtn.addEventListener('click', generateInsights);

    autoRefresh.checked = localStorage.getItem('autoRefresh') === '1';
    autoRefresh.addEventListener('change', () => setAutoRefresh(autoRefresh.checked));
    setAutoRefresh(autoRefresh.checked);

    loadDashboard().catch((err) => setStatus(statusEl, err.message, 'error'));
  </script>
</body>
</html>
"#;
