//! Annotation form page
//!
//! One embedded HTML page, vanilla JS against the JSON API. Tab moves
//! between the three input fields and the confirm button, so a practiced
//! operator never leaves the keyboard.

use axum::response::{Html, IntoResponse};

/// GET /
pub async fn annotation_page() -> impl IntoResponse {
    let version = env!("CARGO_PKG_VERSION");

    let html = format!(
        r#"<!DOCTYPE html>
<html lang="ja">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>EPG Dataset Annotator</title>
    <style>
        * {{
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }}
        body {{
            font-family: 'Segoe UI', 'Hiragino Sans', 'Yu Gothic', sans-serif;
            background-color: #1a1a1a;
            color: #e0e0e0;
            line-height: 1.6;
        }}
        header {{
            background-color: #2a2a2a;
            border-bottom: 1px solid #3a3a3a;
            padding: 16px 24px;
            display: flex;
            justify-content: space-between;
            align-items: baseline;
        }}
        h1 {{
            font-size: 22px;
            color: #4a9eff;
        }}
        .version {{
            color: #888;
            font-size: 14px;
            font-family: 'Courier New', monospace;
        }}
        .container {{
            max-width: 768px;
            margin: 0 auto;
            padding: 24px;
        }}
        .hint {{
            color: #888;
            font-size: 14px;
            margin-bottom: 20px;
        }}
        .field {{
            margin-bottom: 16px;
        }}
        .field label {{
            display: block;
            font-size: 14px;
            color: #aaa;
            margin-bottom: 4px;
        }}
        .field input, .field textarea {{
            width: 100%;
            padding: 8px 10px;
            background: #242424;
            border: 1px solid #3a3a3a;
            border-radius: 4px;
            color: #e0e0e0;
            font-size: 15px;
        }}
        .field input:read-only, .field textarea:read-only {{
            background: #1f1f1f;
            color: #999;
        }}
        .field textarea {{
            resize: vertical;
            min-height: 72px;
        }}
        .actions {{
            display: flex;
            align-items: center;
            gap: 16px;
            margin-top: 20px;
        }}
        button {{
            padding: 10px 28px;
            background: #4a9eff;
            color: white;
            border: none;
            border-radius: 4px;
            font-size: 15px;
            font-weight: 600;
            cursor: pointer;
        }}
        button:hover {{
            background: #3a8eef;
        }}
        button:disabled {{
            background: #555;
            cursor: default;
        }}
        #status {{
            color: #888;
            font-size: 14px;
        }}
        #error {{
            color: #ef4444;
            font-size: 14px;
            margin-top: 12px;
            min-height: 20px;
        }}
    </style>
</head>
<body>
    <header>
        <h1>EPG Dataset Annotator</h1>
        <span class="version">v{version}</span>
    </header>
    <div class="container">
        <p class="hint">
            Tab / Shift+Tab でフォームとボタン間を移動できます。
            話数が複数ある場合は ・ (中点)、サブタイトルが複数ある場合は ／ (全角スラッシュ) で区切ります。
        </p>
        <div class="field">
            <label for="record-id">ID (読み取り専用)</label>
            <input id="record-id" readonly tabindex="-1">
        </div>
        <div class="field">
            <label for="record-title">番組タイトル (読み取り専用)</label>
            <input id="record-title" readonly tabindex="-1">
        </div>
        <div class="field">
            <label for="record-description">番組概要 (読み取り専用)</label>
            <textarea id="record-description" readonly tabindex="-1"></textarea>
        </div>
        <div class="field">
            <label for="series-title">シリーズタイトル</label>
            <input id="series-title" autocomplete="off">
        </div>
        <div class="field">
            <label for="episode-number">話数 (該当情報がない場合は空欄)</label>
            <input id="episode-number" autocomplete="off">
        </div>
        <div class="field">
            <label for="subtitle">サブタイトル (該当情報がない場合は空欄)</label>
            <input id="subtitle" autocomplete="off">
        </div>
        <div class="actions">
            <button id="confirm">確定</button>
            <span id="status"></span>
        </div>
        <div id="error"></div>
    </div>
    <script>
        const el = (id) => document.getElementById(id);

        function render(data) {{
            el('error').textContent = '';
            if (data.done) {{
                el('record-id').value = 'アノテーションをすべて完了しました。プロセスを終了してください。';
                el('record-title').value = '';
                el('record-description').value = '';
                el('series-title').value = '';
                el('episode-number').value = '';
                el('subtitle').value = '';
                el('confirm').disabled = true;
                el('status').textContent = `完了: ${{data.total}} 件`;
                return;
            }}
            const record = data.record;
            el('record-id').value = record.id;
            el('record-title').value = record.title;
            el('record-description').value = record.description;
            // Most series titles equal the cleaned programme title; prefill
            // and let the operator trim
            el('series-title').value = record.series_title || record.title;
            el('episode-number').value = record.episode_number || '';
            el('subtitle').value = record.subtitle || '';
            el('status').textContent = `残り ${{data.remaining}} / ${{data.total}} 件`;
            el('confirm').disabled = false;
            el('series-title').focus();
        }}

        async function refresh() {{
            const response = await fetch('/api/current');
            render(await response.json());
        }}

        async function confirm() {{
            el('confirm').disabled = true;
            try {{
                const response = await fetch('/api/annotate', {{
                    method: 'POST',
                    headers: {{ 'Content-Type': 'application/json' }},
                    body: JSON.stringify({{
                        series_title: el('series-title').value,
                        episode_number: el('episode-number').value,
                        subtitle: el('subtitle').value,
                    }}),
                }});
                const data = await response.json();
                if (!response.ok) {{
                    // The edit is retained server-side; report and let the
                    // operator retry
                    el('error').textContent = `保存に失敗しました: ${{data.error}}`;
                    el('confirm').disabled = false;
                    return;
                }}
                render(data);
            }} catch (e) {{
                el('error').textContent = `通信エラー: ${{e}}`;
                el('confirm').disabled = false;
            }}
        }}

        el('confirm').addEventListener('click', confirm);
        refresh();
    </script>
</body>
</html>
"#
    );

    Html(html)
}
