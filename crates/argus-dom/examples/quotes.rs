//! Scrape a small fixture site into typed entities and dump them as JSON.
//!
//! ```sh
//! cargo run -p argus-dom --example quotes
//! ```

use argus_core::{
    DefinitionError, Entity, TypeDescriptor, elements, from_url_attr, scrape_entity, value,
};
use argus_dom::{HtmlReader, StaticPages};
use serde::Serialize;

const INDEX: &str = r#"
<html><body>
    <h1>Quotes of the Day</h1>
    <div class="quote">
        <span class="text">So it goes.</span>
        <a class="author-link" href="/author/vonnegut">Kurt Vonnegut</a>
    </div>
    <div class="quote">
        <span class="text">The medium is the message.</span>
        <a class="author-link" href="/author/mcluhan">Marshall McLuhan</a>
    </div>
</body></html>
"#;

const VONNEGUT: &str = r#"
<html><body>
    <h2 class="author-name">Kurt Vonnegut</h2>
    <span class="born">1922</span>
</body></html>
"#;

const MCLUHAN: &str = r#"
<html><body>
    <h2 class="author-name">Marshall McLuhan</h2>
    <span class="born">1911</span>
</body></html>
"#;

#[derive(Debug, Default, Serialize)]
struct Quote {
    text: String,
    author_name: String,
}

impl Entity for Quote {
    fn descriptor() -> Result<TypeDescriptor<Self>, DefinitionError> {
        TypeDescriptor::builder("Quote")
            .field("text", |e: &mut Quote| &mut e.text)
            .extract(value(".text"))
            .parsed()
            .field("author_name", |e: &mut Quote| &mut e.author_name)
            .extract(value("a.author-link"))
            .parsed()
            .build()
    }
}

#[derive(Debug, Default, Serialize)]
struct Author {
    name: String,
    born: u32,
}

impl Entity for Author {
    fn descriptor() -> Result<TypeDescriptor<Self>, DefinitionError> {
        TypeDescriptor::builder("Author")
            .field("name", |e: &mut Author| &mut e.name)
            .extract(value(".author-name"))
            .parsed()
            .field("born", |e: &mut Author| &mut e.born)
            .extract(value(".born"))
            .parsed()
            .build()
    }
}

#[derive(Debug, Default, Serialize)]
struct QuotePage {
    title: String,
    quotes: Vec<Quote>,
    authors: Vec<Author>,
}

impl Entity for QuotePage {
    fn descriptor() -> Result<TypeDescriptor<Self>, DefinitionError> {
        TypeDescriptor::builder("QuotePage")
            .field("title", |e: &mut QuotePage| &mut e.title)
            .extract(value("h1"))
            .parsed()
            .collection("quotes", |e: &mut QuotePage| &mut e.quotes)
            .extract(elements(".quote"))
            .entities()
            // One dereference cycle per author link, back on the index
            // page between each.
            .collection("authors", |e: &mut QuotePage| &mut e.authors)
            .extract(from_url_attr("a.author-link", "href"))
            .entities()
            .build()
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let pages = StaticPages::new()
        .page("https://quotes.test/", INDEX)
        .page("https://quotes.test/author/vonnegut", VONNEGUT)
        .page("https://quotes.test/author/mcluhan", MCLUHAN);
    let mut reader = HtmlReader::open(pages, "https://quotes.test/")?;

    let page: QuotePage = scrape_entity(&mut reader)?;
    println!("{}", serde_json::to_string_pretty(&page)?);
    Ok(())
}
