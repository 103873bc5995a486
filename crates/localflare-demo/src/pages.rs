//! Page markup served by the demo binaries.

/// Landing page of the `hello-world` binary.
pub const HELLO_INDEX: &str = r#"<html>
<head>
    <title>Hello LocalFlare</title>
    <style>
        body {
            font-family: Arial, sans-serif;
            display: flex;
            justify-content: center;
            align-items: center;
            height: 100vh;
            margin: 0;
            background-color: #f0f0f0;
        }
        .container {
            text-align: center;
            padding: 2rem;
            background-color: white;
            border-radius: 10px;
            box-shadow: 0 2px 5px rgba(0,0,0,0.1);
        }
        h1 { color: #333; }
    </style>
</head>
<body>
    <div class="container">
        <h1>Welcome to LocalFlare!</h1>
        <p>A minimal example application.</p>
    </div>
</body>
</html>
"#;

/// Main page of the `localflare-demo` binary. Calls the handlers in
/// [`crate::handlers`] through `window.api`.
pub const DEMO_INDEX: &str = r#"<html>
<head>
    <title>LocalFlare Demo</title>
    <style>
        body { font-family: Arial, sans-serif; max-width: 800px; margin: 0 auto; padding: 20px; }
        .card { background: white; border-radius: 8px; padding: 20px; margin-bottom: 20px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
        button { background: #4CAF50; color: white; border: none; padding: 10px 20px; border-radius: 4px; cursor: pointer; }
        button:hover { background: #45a049; }
        pre { background: #f5f5f5; padding: 10px; border-radius: 4px; overflow-x: auto; }
        li.dir { cursor: pointer; font-weight: bold; }
    </style>
</head>
<body>
    <h1>LocalFlare Demo</h1>

    <div class="card">
        <h2>System info</h2>
        <button onclick="getSystemInfo()">Get system info</button>
        <pre id="systemInfo"></pre>
    </div>

    <div class="card">
        <h2>Read a file</h2>
        <input type="text" id="filePath" placeholder="File path" style="width: 100%; margin-bottom: 10px;">
        <button onclick="readFile()">Read file</button>
        <pre id="fileContent"></pre>
    </div>

    <div class="card">
        <h2>File browser</h2>
        <div id="currentDir"></div>
        <button onclick="listDir('..', true)">Up</button>
        <ul id="entries"></ul>
    </div>

    <p><a href="/about">About</a></p>

    <script>
        async function getSystemInfo() {
            const out = document.getElementById('systemInfo');
            try {
                const info = await window.api.get_system_info();
                out.textContent = JSON.stringify(info, null, 2);
            } catch (error) {
                out.textContent = 'Error: ' + error.message;
            }
        }

        async function readFile() {
            const path = document.getElementById('filePath').value;
            const out = document.getElementById('fileContent');
            if (!path) {
                alert('Please enter a file path');
                return;
            }
            try {
                const result = await window.api.read_file({ path: path });
                out.textContent = result.content;
            } catch (error) {
                out.textContent = 'Error: ' + error.message;
            }
        }

        let currentDir = '.';

        async function listDir(name, relative) {
            const path = relative ? currentDir + '/' + name : name;
            const list = document.getElementById('entries');
            try {
                const result = await window.api.list_dir({ path: path });
                currentDir = result.path;
                document.getElementById('currentDir').textContent = currentDir;
                list.innerHTML = '';
                for (const entry of result.entries) {
                    const li = document.createElement('li');
                    li.textContent = entry.is_dir ? entry.name + '/' : entry.name + ' (' + entry.size + ' bytes)';
                    if (entry.is_dir) {
                        li.className = 'dir';
                        li.onclick = function() { listDir(entry.name, true); };
                    }
                    list.appendChild(li);
                }
            } catch (error) {
                list.textContent = 'Error: ' + error.message;
            }
        }

        listDir('.', false);
    </script>
</body>
</html>
"#;

/// Inline template for `/about`, used when no template folder is configured.
pub const ABOUT_TEMPLATE: &str = r#"<html>
<head><title>About {{ name }}</title></head>
<body>
    <h1>{{ name }} v{{ version }}</h1>
    <p>Registered handlers: {{ handlers }}</p>
    <p><a href="/">Back</a></p>
</body>
</html>
"#;

/// Template file looked up in the configured template folder.
pub const ABOUT_TEMPLATE_FILE: &str = "about.html";

/// The demo's 404 page for `path`.
pub fn not_found_page(path: &str) -> String {
    let path = path
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");
    format!(
        "<html>\n<head><title>Not found</title></head>\n<body>\n    <h1>Not found</h1>\n    \
         <p>No page at <code>{path}</code>.</p>\n    <p><a href=\"/\">Back</a></p>\n</body>\n</html>\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_page_escapes_the_path() {
        let page = not_found_page("/a<b>&c");
        assert!(page.contains("<code>/a&lt;b&gt;&amp;c</code>"));
        assert!(page.starts_with("<html>"));
    }
}
