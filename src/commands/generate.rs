//! Generate static files

use anyhow::Result;

use crate::cms::ContentSource;
use crate::generator::Generator;
use crate::Blog;

/// Generate the static site from the configured content service
pub async fn run(blog: &Blog) -> Result<()> {
    let source = blog.content_source()?;
    run_with_source(blog, &source).await
}

/// Generate the static site from `source`
pub async fn run_with_source(blog: &Blog, source: &dyn ContentSource) -> Result<()> {
    let start = std::time::Instant::now();

    let generator = Generator::new(blog)?;
    generator.generate(source).await?;

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}
