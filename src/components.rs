use maud::{html, Markup, Render, DOCTYPE};

use crate::icons;

pub fn layout(main_content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                meta http-equiv="X-UA-Compatible" content="ie=edge";
                title {"Payment Status"}
                style {"
                    body { font-family: system-ui, sans-serif; max-width: 32rem; margin: 4rem auto; padding: 0 1rem; }
                    .alert { display: flex; gap: .75rem; align-items: center; padding: 1rem; border-radius: .5rem; }
                    .alert-success { background: #d1fae5; color: #065f46; }
                    .alert-error { background: #fee2e2; color: #991b1b; }
                    .alert-warning { background: #fef3c7; color: #92400e; }
                    .h-6 { height: 1.5rem; } .w-6 { width: 1.5rem; }
                "}
            }
            body {
                main #"main_content" { (main_content) }
            }
        }
    }
}

pub enum StatusCard<'a> {
    Success(&'a str),
    Warning(&'a str),
    Error(&'a str),
}

impl Render for StatusCard<'_> {
    fn render(&self) -> Markup {
        let (classname, icon, text) = match self {
            Self::Success(text) => ("alert-success", icons::success(), text),
            Self::Warning(text) => ("alert-warning", icons::warning(), text),
            Self::Error(text) => ("alert-error", icons::error(), text),
        };

        html! {
            ."alert".(classname) role="alert" {
                (icon)
                span {(text)}
            }
        }
    }
}
