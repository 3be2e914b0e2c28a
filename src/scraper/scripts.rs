//! JavaScript run inside the page by [`ChromeRenderClient`](super::ChromeRenderClient).
//!
//! Element functions are passed to `Runtime.callFunctionOn`, so `this` is
//! bound to the element handle.

/// Hides the most common automation fingerprints before any page script runs
pub const STEALTH: &str = r#"
    Object.defineProperty(navigator, 'webdriver', { get: () => undefined });
    Object.defineProperty(navigator, 'languages', { get: () => ['en-CA', 'en'] });
    window.chrome = window.chrome || { runtime: {} };
"#;

/// True when the element has a rendered, non-hidden box
pub const IS_VISIBLE: &str = r#"
    function() {
        const rect = this.getBoundingClientRect();
        const style = window.getComputedStyle(this);
        return rect.width > 0
            && rect.height > 0
            && style.visibility !== 'hidden'
            && style.display !== 'none';
    }
"#;

/// Visible and not disabled
pub const IS_CLICKABLE: &str = r#"
    function() {
        const rect = this.getBoundingClientRect();
        const style = window.getComputedStyle(this);
        const visible = rect.width > 0
            && rect.height > 0
            && style.visibility !== 'hidden'
            && style.display !== 'none';
        return visible && !this.disabled && this.getAttribute('aria-disabled') !== 'true';
    }
"#;

/// True when another element sits on top of this one's click point
pub const IS_INTERCEPTED: &str = r#"
    function() {
        const rect = this.getBoundingClientRect();
        const top = document.elementFromPoint(rect.left + rect.width / 2, rect.top + rect.height / 2);
        return !!top && top !== this && !this.contains(top);
    }
"#;

/// Smooth-scroll the element to the middle of the viewport
pub const SCROLL_INTO_VIEW: &str = r#"
    function() {
        this.scrollIntoView({ behavior: 'smooth', block: 'center' });
    }
"#;

/// Programmatic click, used when a native click would land on an overlay
pub const FORCE_CLICK: &str = r#"
    function() {
        this.click();
        return true;
    }
"#;

/// Full serialized document
pub const OUTER_HTML: &str = "document.documentElement.outerHTML";

/// Build the launch arguments for Chrome
pub fn browser_args(block_images: bool, user_agent: Option<&str>) -> Vec<String> {
    let mut args = vec![
        "--no-sandbox".to_string(),
        "--disable-gpu".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--disable-blink-features=AutomationControlled".to_string(),
    ];

    if block_images {
        args.push("--blink-settings=imagesEnabled=false".to_string());
    }

    if let Some(ua) = user_agent {
        args.push(format!("--user-agent={}", ua));
    }

    args
}
