//! List posts from the content service

use anyhow::Result;

use crate::cms::ContentSource;
use crate::content::ListingState;
use crate::generator::Generator;
use crate::helpers::format_date;
use crate::Blog;

/// Print the post listing; with `all`, follow the cursor to the end
pub async fn run(blog: &Blog, all: bool) -> Result<()> {
    let source = blog.content_source()?;
    let listing = collect(blog, &source, all).await?;

    println!("Posts ({}):", listing.posts().len());
    for post in listing.posts() {
        let date = post
            .first_publication_date
            .as_ref()
            .map(|d| format_date(d, "YYYY-MM-DD"))
            .unwrap_or_else(|| "----------".to_string());
        println!("  {} - {} [{}] by {}", date, post.title, post.uid, post.author);
    }
    if listing.has_more() {
        println!("More posts available (use --all to load them)");
    }

    Ok(())
}

/// Fetch the first listing page and, with `all`, every following page
pub async fn collect(blog: &Blog, source: &dyn ContentSource, all: bool) -> Result<ListingState> {
    let generator = Generator::new(blog)?;
    let mut listing = generator.fetch_listing(source).await?;

    while all && listing.has_more() {
        listing = listing.load_more(source).await?;
        tracing::debug!(
            "Listing version {} holds {} posts",
            listing.version(),
            listing.posts().len()
        );
    }

    Ok(listing)
}
