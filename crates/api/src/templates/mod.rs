use maud::{html, Markup, DOCTYPE};

/// Static index of the available routes, served at `/`.
pub fn home_page() -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { "Climate API" }
            }
            body {
                h1 { "Welcome to the Climate App API!" }
                h2 { "Available Routes:" }
                ul {
                    li {
                        "Precipitation data for the trailing year: "
                        code { "/api/v1.0/precipitation" }
                    }
                    li {
                        "Weather station directory: "
                        code { "/api/v1.0/stations" }
                    }
                    li {
                        "Most active station temperature observations: "
                        code { "/api/v1.0/tobs" }
                    }
                    li {
                        "Temperature metrics since start = YYYY-MM-DD: "
                        code { "/api/v1.0/{start}" }
                    }
                    li {
                        "Temperature metrics from start to end (inclusive): "
                        code { "/api/v1.0/{start}/{end}" }
                    }
                }
                p {
                    a href="/docs" { "API Docs" }
                }
            }
        }
    }
}
