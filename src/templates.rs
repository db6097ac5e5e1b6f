use maud::{DOCTYPE, Markup, html};

use crate::models::{Cast, Credits, Movie};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

pub fn movie_page(movie: &Movie, credits: Option<&Credits>, image_base: &str) -> String {
    let image_base = image_base.trim_end_matches('/');
    let cast: &[Cast] = credits.map(|c| c.cast.as_slice()).unwrap_or_default();

    page(
        &movie.title,
        html! {
            div class="mx-auto mt-6 max-w-5xl sm:px-6 lg:grid lg:grid-cols-3 lg:gap-x-8 lg:px-8" {
                div class="col-span-1" {
                    @if let Some(poster) = &movie.poster_path {
                        img class="w-full max-w-sm h-auto rounded-lg shadow-lg sm:mb-4"
                            src=(image_url(image_base, poster)) alt=(movie.title);
                    }
                }

                div class="col-span-2 space-y-6" {
                    h1 class="text-4xl font-bold mb-8" { (movie.title) }

                    (info_row("장르", html! {
                        div class="flex flex-wrap space-x-3" {
                            @for genre in &movie.genres {
                                span { (genre.name) }
                            }
                        }
                    }))

                    (info_row("개요", html! {
                        div {
                            (movie.origin_country.join(", "))
                            @if let Some(runtime) = movie.runtime {
                                ", " (runtime) "분"
                            }
                        }
                    }))

                    (info_row("개봉", html! {
                        div { (movie.release_date.as_deref().unwrap_or("-")) }
                    }))

                    (info_row("평점", html! {
                        div { "★ " (format!("{:.1}", movie.vote_average)) }
                    }))

                    p class="text-sm" { (movie.overview) }
                }
            }

            div class="mx-auto mt-6 max-w-5xl sm:px-6 lg:px-8 space-y-3" {
                h2 class="font-bold text-lg" { "출연진" }
                div class="flex overflow-x-scroll space-x-3" {
                    @for member in cast {
                        div class="flex-shrink-0 w-20" {
                            div class="flex flex-col items-center" {
                                @if let Some(profile) = &member.profile_path {
                                    img class="w-full h-auto rounded-lg shadow-lg"
                                        src=(image_url(image_base, profile)) alt=(member.name);
                                } @else {
                                    div class="mt-2 w-full h-28 bg-slate-500 rounded-lg shadow-lg" {}
                                }
                                div class="mt-2 text-center text-xs" { (member.name) }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn not_found_page(movie_id: &str) -> String {
    message_page("Not found", &format!("Movie {movie_id} could not be found."))
}

pub fn error_page(message: &str) -> String {
    message_page("Error", message)
}

fn message_page(heading: &str, message: &str) -> String {
    page(
        heading,
        html! {
            div class="min-h-screen bg-gray-50 flex items-center justify-center" {
                div class="max-w-xl w-full px-6" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-2xl font-bold text-gray-900" { (heading) }
                        p class="mt-4 text-gray-700" { (message) }
                    }
                }
            }
        },
    )
}

fn info_row(label: &str, value: Markup) -> Markup {
    html! {
        div class="flex flex-wrap space-x-10 text-lg" {
            div class="font-bold" { (label) }
            (value)
        }
    }
}

fn image_url(base: &str, path: &str) -> String {
    format!("{}/{}", base, path.trim_start_matches('/'))
}

fn page(title: &str, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="ko" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                script src=(TAILWIND_CDN) {}
            }
            body { (body) }
        }
    }
    .into_string()
}
