//! Server-rendered pages for browsers.

use maud::{html, Markup, DOCTYPE};

use crate::db::{Comment, Post};

fn layout(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                link rel="stylesheet" href="/css/style.css";
            }
            body {
                header {
                    h1 { a href="/blog" { "Gaming Blog" } }
                }
                main { (body) }
            }
        }
    }
}

/// Post index with the create form.
pub fn index(posts: &[Post]) -> Markup {
    layout(
        "Gaming Blog",
        html! {
            section.posts {
                @if posts.is_empty() {
                    p.empty { "No posts yet." }
                }
                @for post in posts {
                    article.post {
                        h2 { a href={ "/blog/" (post.id) } { (post.title) } }
                        p.meta { "Posted " (post.created_at.format("%Y-%m-%d %H:%M").to_string()) }
                    }
                }
            }
            section.new-post {
                h2 { "New post" }
                form method="post" action="/blog/create" {
                    label { "Title " input type="text" name="title" required; }
                    label { "Content " textarea name="content" required {} }
                    input type="hidden" name="userID" value="1";
                    button type="submit" { "Publish" }
                }
            }
        },
    )
}

/// One post followed by its comments, oldest first.
pub fn post_detail(post: &Post, comments: &[Comment]) -> Markup {
    layout(
        &post.title,
        html! {
            article.post {
                h2 { (post.title) }
                p.meta {
                    "Posted " (post.created_at.format("%Y-%m-%d %H:%M").to_string())
                    @if let Some(updated) = post.updated_at {
                        ", edited " (updated.format("%Y-%m-%d %H:%M").to_string())
                    }
                }
                div.content { (post.content) }
            }
            section.comments {
                h3 { "Comments (" (comments.len()) ")" }
                @if comments.is_empty() {
                    p.empty { "No comments yet." }
                }
                @for comment in comments {
                    div.comment id={ "comment-" (comment.id) } {
                        p.meta {
                            "User " (comment.user_id) " on "
                            (comment.created_at.format("%Y-%m-%d %H:%M").to_string())
                        }
                        p { (comment.content) }
                    }
                }
            }
        },
    )
}
