use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{AdminView, PlayView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", PlayView)] Play {},
        #[route("/admin", AdminView)] Admin {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    rsx! {
        nav { class: "sidebar",
            h1 { "Trivia" }
            ul {
                li { Link { to: Route::Play {}, "Play" } }
                li { Link { to: Route::Admin {}, "Admin" } }
            }
        }
    }
}
