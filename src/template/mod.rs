//! Templating code.
//!
//! This defines the [`Page`] item, which every HTML response is wrapped in.

use chrono::Datelike;
use hypertext::prelude::*;

use crate::settings::Settings;

pub struct Page<R: Renderable> {
    body: Option<R>,
    event_name: Option<String>,
    logo_url: Option<String>,
    banner_url: Option<String>,
    admin: bool,
}

impl<R: Renderable> Page<R> {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn body(mut self, body: R) -> Self {
        self.body = Some(body);
        self
    }

    pub fn event_name(mut self, name: &str) -> Self {
        self.event_name = Some(name.to_string());
        self
    }

    pub fn branding(mut self, settings: &Settings) -> Self {
        self.logo_url = settings.logo_url.clone();
        self.banner_url = settings.banner_url.clone();
        self
    }

    /// Shows the admin navigation (and the log out button).
    pub fn admin(mut self, admin: bool) -> Self {
        self.admin = admin;
        self
    }
}

impl<R: Renderable> Renderable for Page<R> {
    fn render_to(
        &self,
        buffer: &mut hypertext::Buffer<hypertext::context::Node>,
    ) {
        let title = self.event_name.as_deref().unwrap_or("Registrations");
        let year = chrono::Utc::now().year().to_string();

        maud! {
            html {
                head {
                    title { (title) }
                    script src="https://cdn.jsdelivr.net/npm/htmx.org@2.0.7/dist/htmx.min.js" integrity="sha384-ZBXiYtYQ6hJ2Y0ZNoYuI+Nq5MqWBr+chMrS/RkXpNzQCApHEhOt2aY8EJgqwHLkJ" crossorigin="anonymous" {
                    }
                    link href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css" rel="stylesheet";
                    meta
                        name="viewport"
                        content="width=device-width, initial-scale=1";
                }
                body class="d-flex flex-column min-vh-100" {
                    nav class="navbar navbar-expand"
                        style="background-color: #1f2937; display: flex; justify-content: space-between; align-items: center;"
                        data-bs-theme="dark" {
                        div class="container-fluid" style="display: flex; justify-content: space-between; align-items: center;" {
                            a class="navbar-brand text-white" href="/" {
                                @if let Some(logo) = &self.logo_url {
                                    img src=(logo) alt="" height="32" class="me-2";
                                }
                                (title)
                            }
                            ul class="navbar-nav" style="display: flex; gap: 1rem;" data-bs-theme="dark" {
                                li class="nav-item" {
                                    a class="nav-link text-white" href="/register" {
                                        "Register"
                                    }
                                }
                                li class="nav-item" {
                                    a class="nav-link text-white" href="/contact" {
                                        "Contact"
                                    }
                                }
                                li class="nav-item" {
                                    a class="nav-link text-white" href="/admin" {
                                        "Admin"
                                    }
                                }
                                @if self.admin {
                                    li class="nav-item" {
                                        form method="post" action="/admin/logout" {
                                            button type="submit" class="btn btn-link nav-link text-white" {
                                                "Log out"
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                    @if let Some(banner) = &self.banner_url {
                        img src=(banner) alt="" class="w-100" style="max-height: 16rem; object-fit: cover;";
                    }
                    div class="container flex-grow-1 py-4" {
                        @if let Some(body) = &self.body {
                            (body)
                        }
                    }
                    footer class="text-center text-muted py-3 small" {
                        "© " (year) " " (title)
                    }
                }
            }
        }.render_to(buffer)
    }
}

impl<R: Renderable> Default for Page<R> {
    fn default() -> Self {
        Self {
            body: Default::default(),
            event_name: Default::default(),
            logo_url: Default::default(),
            banner_url: Default::default(),
            admin: Default::default(),
        }
    }
}
