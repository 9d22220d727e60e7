//! State-dependent class helpers; the rules live in `assets/main.css`.

pub fn nav_button(active: bool) -> &'static str {
    if active {
        "nav-btn nav-btn-active"
    } else {
        "nav-btn"
    }
}

pub fn dropzone(disabled: bool) -> &'static str {
    if disabled {
        "dropzone dropzone-disabled"
    } else {
        "dropzone"
    }
}
