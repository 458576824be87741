//! Console relay injection.
//!
//! Builds the preview document handed to an isolated context: the relay
//! script goes in first, then the user's source, so interception is
//! installed before any user code runs. The relay wraps the four console
//! methods and the uncaught-error handler, forwarding each event as one
//! JSON payload over the host channel while still invoking the original
//! console behavior.

/// Marker property present on every relay payload. The host sink treats
/// anything without it as unrelated traffic and drops it.
pub const RELAY_MARKER: &str = "__vitroLog";

/// Name of the host binding the relay calls with a serialized payload.
pub const RELAY_BINDING: &str = "__vitroRelay";

/// The interception script injected ahead of user code.
///
/// Forwarding is additive: the original console method still runs after the
/// payload is sent. Argument stringification never throws — objects go
/// through `JSON.stringify`, everything else through `String()`, and a
/// failing serializer falls back to `String()`. When no host binding exists
/// (the document opened outside the sandbox) the relay falls back to a
/// wildcard `postMessage` to its parent.
const RELAY_SCRIPT: &str = r#"(function () {
  function forward(type, args) {
    var parts = [];
    for (var i = 0; i < args.length; i++) {
      var a = args[i];
      try {
        parts.push(typeof a === "object" ? JSON.stringify(a) : String(a));
      } catch (e) {
        parts.push(String(a));
      }
    }
    try {
      var payload = { __vitroLog: true, type: type, args: parts };
      if (typeof window.__vitroRelay === "function") {
        window.__vitroRelay(JSON.stringify(payload));
      } else if (parent !== window) {
        parent.postMessage(payload, "*");
      }
    } catch (e) {}
  }
  ["log", "info", "warn", "error"].forEach(function (fn) {
    var orig = console[fn];
    console[fn] = function () {
      forward(fn, Array.prototype.slice.call(arguments));
      try { orig.apply(console, arguments); } catch (e) {}
    };
  });
  window.addEventListener("error", function (e) {
    forward("error", [e.message + " (line: " + (e.lineno || "?") + ")"]);
  });
})();"#;

/// Assembles the full HTML document for one isolated-context generation.
///
/// The host performs no validation of `source`: empty or malformed markup
/// is handed over as-is and absorbed by the context's own parser.
pub fn build_preview_document(source: &str) -> String {
    format!(
        "<!doctype html><html><head></head><body><script>{RELAY_SCRIPT}</script>\n{source}</body></html>"
    )
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_precedes_user_source() {
        let doc = build_preview_document("<h1>hi</h1>");
        let relay_at = doc.find(RELAY_BINDING).unwrap();
        let source_at = doc.find("<h1>hi</h1>").unwrap();
        assert!(relay_at < source_at);
    }

    #[test]
    fn test_document_shape() {
        let doc = build_preview_document("");
        assert!(doc.starts_with("<!doctype html>"));
        assert!(doc.ends_with("</body></html>"));
    }

    #[test]
    fn test_script_names_match_constants() {
        // The script hardcodes the names; keep the constants in sync.
        assert!(RELAY_SCRIPT.contains(RELAY_MARKER));
        assert!(RELAY_SCRIPT.contains(RELAY_BINDING));
    }

    #[test]
    fn test_script_intercepts_all_levels_and_errors() {
        for level in ["log", "info", "warn", "error"] {
            assert!(RELAY_SCRIPT.contains(&format!("\"{level}\"")), "{level} missing");
        }
        assert!(RELAY_SCRIPT.contains("addEventListener(\"error\""));
        assert!(RELAY_SCRIPT.contains("e.lineno"));
    }

    #[test]
    fn test_script_embeds_safely() {
        // A closing script tag inside the relay would truncate the injected
        // block and leak the rest into the document.
        assert!(!RELAY_SCRIPT.contains("</script>"));
    }

    #[test]
    fn test_malformed_source_is_passed_through() {
        let doc = build_preview_document("<div><span>unclosed");
        assert!(doc.contains("<div><span>unclosed"));
    }
}
