//! Seeded demonstration content shown while the backend has no posts for
//! this company yet (onboarding and demo accounts). Demo posts carry
//! `PostId::Demo` ids and are mutated purely locally.

use chrono::{Duration, Utc};
use sitefeed_types::{Audience, Author, Comment, Post, PostId};
use uuid::Uuid;

fn demo_author(n: u128, first: &str, last: &str, role: &str, color: &str) -> Author {
    Author {
        id: Uuid::from_u128(n),
        first_name: first.to_string(),
        last_name: last.to_string(),
        role: role.to_string(),
        color: color.to_string(),
    }
}

/// The fixed demonstration collection. Timestamps are staggered relative
/// to now so recency ordering stays meaningful whenever the seed is
/// produced.
pub fn seed_posts() -> Vec<Post> {
    let now = Utc::now();
    let marta = demo_author(0xd1, "Marta", "Diaz", "Site Supervisor", "#2a6f4e");
    let omar = demo_author(0xd2, "Omar", "Haddad", "Project Manager", "#8a4b12");
    let lena = demo_author(0xd3, "Lena", "Marlow", "Safety Officer", "#4a5b8c");

    vec![
        Post {
            id: PostId::Demo(1),
            content: "Welcome to your company feed! Pin important updates so the whole crew \
                      sees them first."
                .to_string(),
            author: omar.clone(),
            audience: Audience::Everyone,
            pinned: true,
            urgent: false,
            created_at: now - Duration::hours(30),
            likes: vec![marta.id],
            like_count: 1,
            comments: Vec::new(),
        },
        Post {
            id: PostId::Demo(2),
            content: "Concrete pour on the Riverside site is scheduled for Thursday 7am. \
                      @Marta please confirm the pump booking."
                .to_string(),
            author: omar,
            audience: Audience::Sites(vec!["riverside".to_string()]),
            pinned: false,
            urgent: true,
            created_at: now - Duration::hours(4),
            likes: Vec::new(),
            like_count: 0,
            comments: vec![Comment {
                id: Uuid::from_u128(0xc1),
                content: "Pump is booked, arriving 6:30.".to_string(),
                author: marta.clone(),
                created_at: now - Duration::hours(3),
            }],
        },
        Post {
            id: PostId::Demo(3),
            content: "Reminder: toolbox talk every Monday morning. Attendance sheets go to \
                      the site office."
                .to_string(),
            author: lena,
            audience: Audience::Everyone,
            pinned: false,
            urgent: false,
            created_at: now - Duration::hours(20),
            likes: vec![marta.id],
            like_count: 1,
            comments: Vec::new(),
        },
    ]
}
