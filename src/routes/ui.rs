use axum::{response::Html, Router, routing::get};

pub fn router() -> Router {
    Router::new().route("/", get(index))
}

async fn index() -> Html<&'static str> {
    Html(r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>ScholarSynth - Literature Review Assistant</title>
  <style>
    body { font-family: Arial, sans-serif; margin: 2rem; color: #1d1d1f; max-width: 60rem; }
    h1 { margin-bottom: 0.5rem; }
    .card { border: 1px solid #ddd; padding: 1rem; border-radius: 8px; margin-bottom: 1rem; }
    label { display: block; margin-top: 0.75rem; font-weight: 600; }
    input { width: 100%; padding: 0.5rem; box-sizing: border-box; }
    button { margin-top: 1rem; margin-right: 0.5rem; padding: 0.6rem 1rem; }
    pre { background: #f6f8fa; padding: 1rem; overflow: auto; white-space: pre-wrap; }
    .muted { color: #6e6e73; font-size: 0.9rem; }
  </style>
</head>
<body>
  <h1>ScholarSynth</h1>
  <p>Generate a markdown literature review for any research topic, assembled from arXiv papers.</p>

  <div class="card">
    <h2>1) API key</h2>
    <p class="muted">Stored encrypted on the server. Without it, reviews use the deterministic template.</p>
    <label>Groq API key</label>
    <input id="apiKey" type="password" placeholder="gsk_..." />
    <button id="saveKeyBtn">Save key</button>
    <span id="keyStatus" class="muted"></span>
  </div>

  <div class="card">
    <h2>2) Generate review</h2>
    <label>Research topic</label>
    <input id="topic" placeholder="e.g., transformer neural networks, quantum computing" />
    <button id="generateBtn">Generate review</button>
    <span id="status" class="muted"></span>
  </div>

  <div class="card">
    <h2>Review</h2>
    <pre id="output"></pre>
    <button id="downloadMdBtn" disabled>Download markdown</button>
    <button id="downloadTxtBtn" disabled>Download plain text</button>
  </div>

  <script>
    const output = document.getElementById('output');
    const status = document.getElementById('status');
    const keyStatus = document.getElementById('keyStatus');
    const downloadMdBtn = document.getElementById('downloadMdBtn');
    const downloadTxtBtn = document.getElementById('downloadTxtBtn');
    let currentReview = '';

    async function refreshKeyStatus() {
      const res = await fetch('/api/settings');
      if (!res.ok) return;
      const json = await res.json();
      keyStatus.textContent = json.api_key_set ? 'Key saved.' : 'No key saved.';
    }
    refreshKeyStatus();

    document.getElementById('saveKeyBtn').addEventListener('click', async () => {
      const key = document.getElementById('apiKey').value.trim();
      keyStatus.textContent = 'Saving...';
      const res = await fetch('/api/settings', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({ groq_api_key: key })
      });
      keyStatus.textContent = res.ok ? 'Key saved.' : 'Failed to save key.';
    });

    document.getElementById('generateBtn').addEventListener('click', async () => {
      const topic = document.getElementById('topic').value.trim();
      if (!topic) {
        status.textContent = 'Enter a research topic first.';
        return;
      }
      status.textContent = 'Fetching papers and writing the review...';
      output.textContent = '';
      downloadMdBtn.disabled = true;
      downloadTxtBtn.disabled = true;

      const res = await fetch('/api/review', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({ topic })
      });
      if (!res.ok) {
        status.textContent = 'Request failed (' + res.status + ').';
        return;
      }
      const json = await res.json();
      currentReview = json.chunks.map(c => c.content).join('\n\n');
      output.textContent = currentReview;
      status.textContent = 'Done in ' + json.response_time_ms + ' ms.';
      downloadMdBtn.disabled = !currentReview;
      downloadTxtBtn.disabled = !currentReview;
    });

    async function download(format, filename) {
      const res = await fetch('/api/review/export', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({ content: currentReview, format })
      });
      if (!res.ok) return;
      const blob = await res.blob();
      const a = document.createElement('a');
      a.href = URL.createObjectURL(blob);
      a.download = filename;
      a.click();
      URL.revokeObjectURL(a.href);
    }

    downloadMdBtn.addEventListener('click', () => download('markdown', 'literature_review.md'));
    downloadTxtBtn.addEventListener('click', () => download('text', 'literature_review.txt'));
  </script>
</body>
</html>"#)
}
