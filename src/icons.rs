use maud::PreEscaped;

type HTML = PreEscaped<&'static str>;

pub fn success() -> HTML {
    PreEscaped(
        r#"<svg class="h-6 w-6" fill="none" stroke="currentColor" stroke-width="2" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24">
            <circle cx="12" cy="12" r="10" />
            <path d="M7 12.5L10.5 16L17 9" />
        </svg>"#,
    )
}

pub fn warning() -> HTML {
    PreEscaped(
        r#"<svg class="h-6 w-6" fill="none" stroke="currentColor" stroke-width="2" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24">
            <path d="M12 3L22 20H2L12 3Z" />
            <path d="M12 10V14M12 17V17.5" />
        </svg>"#,
    )
}

pub fn error() -> HTML {
    PreEscaped(
        r#"<svg class="h-6 w-6" fill="none" stroke="currentColor" stroke-width="2" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24">
            <circle cx="12" cy="12" r="10" />
            <path d="M9 9L15 15M15 9L9 15" />
        </svg>"#,
    )
}
