use axum::{extract::Extension, response::Html, routing::get, Router};
use std::sync::Arc;

use crate::AppState;

pub fn ui_routes() -> Router {
    Router::new()
        .route("/", get(chat_page))
        .route("/chat", get(chat_page))
}

pub async fn chat_page(Extension(state): Extension<Arc<AppState>>) -> Html<String> {
    Html(render_chat_page(&state.config.app_title, state.chat.mode().charts_enabled()))
}

pub fn render_chat_page(title: &str, charts_enabled: bool) -> String {
    CHAT_PAGE
        .replace("{{TITLE}}", &escape_html(title))
        .replace("{{CHARTS}}", if charts_enabled { "true" } else { "false" })
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const CHAT_PAGE: &str = r###"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{TITLE}}</title>
    <style>
        :root { --green: #2E7D32; --blue: #1A4D8F; }
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 0; background: #fafafa; }
        header { display: flex; justify-content: space-between; align-items: center; padding: 1rem 2rem; border-bottom: 1px solid #e0e0e0; }
        header h1 { margin: 0; font-size: 1.4rem; color: var(--green); }
        header a { color: var(--blue); text-decoration: none; }
        main { display: flex; gap: 1.5rem; padding: 1rem 2rem; }
        #chat { flex: 2; }
        #charts { flex: 1; display: none; }
        .chat-bubble { padding: 0.75rem 1rem; border-radius: 0.75rem; margin-bottom: 0.5rem; line-height: 1.45; white-space: pre-wrap; }
        .user-bubble { background-color: #2E7D3220; color: var(--green); }
        .assistant-bubble { background-color: #1A4D8F10; color: var(--blue); }
        form { display: flex; gap: 0.5rem; padding: 1rem 2rem; position: sticky; bottom: 0; background: #fafafa; }
        form input { flex: 1; padding: 0.75rem; border: 1px solid #ccc; border-radius: 0.5rem; }
        form button { padding: 0.75rem 1.25rem; border: none; border-radius: 0.5rem; background: var(--green); color: white; cursor: pointer; }
        .chart { margin-bottom: 1.5rem; }
        .bar-row { display: flex; align-items: center; gap: 0.5rem; margin: 0.25rem 0; }
        .bar-label { width: 35%; font-size: 0.85rem; overflow: hidden; text-overflow: ellipsis; }
        .bar { background: var(--blue); height: 1.1rem; border-radius: 0.2rem; }
        table { border-collapse: collapse; width: 100%; font-size: 0.85rem; }
        td, th { border: 1px solid #ddd; padding: 0.25rem 0.5rem; text-align: left; }
        .status { color: #888; font-style: italic; }
    </style>
</head>
<body>
    <header>
        <h1>{{TITLE}}</h1>
        <a id="download" href="#">💾 Download conversation</a>
    </header>
    <main>
        <section id="chat"></section>
        <section id="charts"><h2>Data Visualization</h2><div id="chart-list"></div></section>
    </main>
    <form id="composer">
        <input id="input" autocomplete="off" placeholder="Type your message and press Enter…">
        <button type="submit">Send</button>
    </form>
    <script>
        const CHARTS_ENABLED = {{CHARTS}};
        const chat = document.getElementById('chat');
        const chartList = document.getElementById('chart-list');
        let sessionId = sessionStorage.getItem('session_id');

        function bubble(role, content) {
            const div = document.createElement('div');
            div.className = 'chat-bubble ' + (role === 'user' ? 'user-bubble' : 'assistant-bubble');
            const who = document.createElement('b');
            who.textContent = (role === 'user' ? 'You' : 'Assistant') + ': ';
            div.appendChild(who);
            div.appendChild(document.createTextNode(content));
            chat.appendChild(div);
            return div;
        }

        function drawChart(rows) {
            const max = Math.max(...rows.map(r => r.value), 1);
            const box = document.createElement('div');
            box.className = 'chart';
            for (const row of rows) {
                const line = document.createElement('div');
                line.className = 'bar-row';
                const label = document.createElement('span');
                label.className = 'bar-label';
                label.textContent = row.label;
                const bar = document.createElement('div');
                bar.className = 'bar';
                bar.style.width = (60 * row.value / max) + '%';
                line.append(label, bar, document.createTextNode(row.value));
                box.appendChild(line);
            }
            const table = document.createElement('table');
            table.innerHTML = '<tr><th>Label</th><th>Value</th></tr>';
            for (const row of rows) {
                const tr = table.insertRow();
                tr.insertCell().textContent = row.label;
                tr.insertCell().textContent = row.value;
            }
            box.appendChild(table);
            chartList.appendChild(box);
        }

        async function ensureSession() {
            if (sessionId) {
                const res = await fetch(`/api/sessions/${sessionId}/messages`);
                if (res.ok) {
                    const data = await res.json();
                    data.messages.forEach(m => bubble(m.role, m.content));
                    return;
                }
            }
            const res = await fetch('/api/sessions', { method: 'POST' });
            sessionId = (await res.json()).session_id;
            sessionStorage.setItem('session_id', sessionId);
        }

        async function loadCharts() {
            if (!CHARTS_ENABLED) return;
            document.getElementById('charts').style.display = 'block';
            const res = await fetch(`/api/sessions/${sessionId}/charts`);
            if (!res.ok) return;
            const data = await res.json();
            chartList.innerHTML = '';
            data.charts.forEach(c => drawChart(c.rows));
        }

        document.getElementById('composer').addEventListener('submit', async (event) => {
            event.preventDefault();
            const input = document.getElementById('input');
            const text = input.value;
            if (!text) return;
            input.value = '';
            bubble('user', text);
            const pending = document.createElement('div');
            pending.className = 'status';
            pending.textContent = 'Assistant is composing a reply…';
            chat.appendChild(pending);
            try {
                const res = await fetch(`/api/sessions/${sessionId}/messages`, {
                    method: 'POST',
                    headers: { 'Content-Type': 'application/json' },
                    body: JSON.stringify({ content: text }),
                });
                const data = await res.json();
                pending.remove();
                if (!res.ok) {
                    bubble('assistant', '⚠️ ' + data.error);
                    return;
                }
                bubble('assistant', data.reply);
                if (data.chart) drawChart(data.chart);
            } catch (err) {
                pending.textContent = 'Request failed: ' + err;
            }
        });

        document.getElementById('download').addEventListener('click', (event) => {
            event.preventDefault();
            if (sessionId) window.location = `/api/sessions/${sessionId}/export`;
        });

        ensureSession().then(loadCharts);
    </script>
</body>
</html>
"###;
