mod common;

use common::*;
use pretty_assertions::assert_eq;
use schema_dump::prelude::*;

/// Three tables, mixed types, one foreign key, one composite unique index,
/// plus the bookkeeping table the listing must drop.
fn blog_catalog() -> FixtureCatalog {
    FixtureCatalog::new()
        .tables(&["users", "migrations", "posts", "tags"])
        .respond(
            "columns:users",
            vec![
                pg_column("id", "serial", "NO", Some("nextval('users_id_seq'::regclass)")),
                pg_column("email", "character varying", "NO", None),
                pg_column("active", "boolean", "YES", Some("true")),
                pg_column(
                    "created_at",
                    "timestamp without time zone",
                    "NO",
                    Some("'now()'::timestamp without time zone"),
                ),
            ],
        )
        .respond("indexes:users", vec![pg_index("users_pkey", "id", "p")])
        .respond(
            "columns:posts",
            vec![
                pg_column("id", "bigserial", "NO", Some("nextval('posts_id_seq'::regclass)")),
                pg_column("user_id", "integer", "NO", None),
                pg_column("slug", "character varying", "NO", None),
                pg_column("lang", "character varying", "NO", Some("'en'::character varying")),
                pg_column("score", "numeric", "YES", Some("0")),
            ],
        )
        .respond(
            "indexes:posts",
            vec![
                pg_index("posts_pkey", "id", "p"),
                pg_index("posts_slug_lang_unique", "slug, lang", "u"),
            ],
        )
        .respond(
            "foreign_keys:posts",
            vec![pg_foreign_key("users", "user_id", "id", "a", "c")],
        )
        .respond(
            "columns:tags",
            vec![
                pg_column("id", "serial", "NO", None),
                pg_column("label", "text", "YES", None),
            ],
        )
        .respond(
            "indexes:tags",
            vec![
                pg_index("tags_label_index", "label", "i"),
            ],
        )
}

#[tokio::test]
async fn test_full_document() {
    let mut dumper = PostgresDumper::with_grammar(blog_catalog(), FixtureGrammar);
    let doc = dumper.dump().await.unwrap();

    assert_eq!(
        doc,
        "\
from orator.migrations import Migration


class InitDb(Migration):
    def up(self):
        with self.schema.create('users') as table:
            self.increments('id')
            self.string('email')
            self.boolean('active').nullable()
            self.timestamp('created_at')
            self.primary(['id'], name=None)

        with self.schema.create('posts') as table:
            self.big_increments('id')
            self.integer('user_id')
            self.string('slug')
            self.string('lang').default('en')
            self.decimal('score').nullable().default(0)
            self.primary(['id'], name=None)
            self.unique(['slug', 'lang'], name='posts_slug_lang_unique')
            self.foreign('user_id').references('id').on('users').on_update('restrict').on_delete('cascade')

        with self.schema.create('tags') as table:
            self.increments('id')
            self.text('label').nullable()
            self.index(['label'], name='tags_label_index')

    def down(self):
        self.schema.drop('users')
        self.schema.drop('posts')
        self.schema.drop('tags')
"
    );
}

#[tokio::test]
async fn test_document_block_counts() {
    let mut dumper = PostgresDumper::with_grammar(blog_catalog(), FixtureGrammar);
    let doc = dumper.dump().await.unwrap();

    assert_eq!(doc.matches("self.schema.create(").count(), 3);
    assert_eq!(doc.matches("self.schema.drop(").count(), 3);
    assert!(!doc.contains("create('migrations')"));
    assert!(!doc.contains("drop('migrations')"));

    let order: Vec<usize> = ["drop('users')", "drop('posts')", "drop('tags')"]
        .iter()
        .map(|needle| doc.find(needle).unwrap())
        .collect();
    assert!(order.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn test_queries_run_in_sequence() {
    let mut dumper = PostgresDumper::with_grammar(blog_catalog(), FixtureGrammar);
    dumper.dump_tables().await.unwrap();

    let catalog = dumper.into_inner();
    assert_eq!(
        catalog.queries,
        vec![
            "tables",
            "columns:users",
            "indexes:users",
            "foreign_keys:users",
            "columns:posts",
            "indexes:posts",
            "foreign_keys:posts",
            "columns:tags",
            "indexes:tags",
            "foreign_keys:tags",
        ]
    );
}

#[tokio::test]
async fn test_table_filter_and_custom_document() {
    let options = DumpOptions::default().only(["tags"]).receiver("table");
    let mut dumper = PostgresDumper::with_grammar(blog_catalog(), FixtureGrammar)
        .with_options(options)
        .with_document(MigrationDocument::new("TagsOnly"));
    let doc = dumper.dump().await.unwrap();

    assert!(doc.contains("class TagsOnly(Migration):"));
    assert!(doc.contains("            table.text('label').nullable()\n"));
    assert_eq!(doc.matches("self.schema.create(").count(), 1);
    assert!(doc.contains("self.schema.drop('tags')"));
}

#[tokio::test]
async fn test_unmapped_type_aborts_dump() {
    let catalog = FixtureCatalog::new()
        .tables(&["places"])
        .respond("columns:places", vec![pg_column("area", "geometry", "YES", None)]);
    let mut dumper = PostgresDumper::with_grammar(catalog, FixtureGrammar);

    let err = dumper.dump().await.unwrap_err();
    assert!(matches!(
        err,
        DumpError::UnmappedType { dialect: Dialect::Postgres, ref native } if native == "geometry"
    ));
}

#[tokio::test]
async fn test_query_failure_propagates() {
    let catalog = blog_catalog().fail_on("indexes:posts");
    let mut dumper = PostgresDumper::with_grammar(catalog, FixtureGrammar);

    let err = dumper.dump().await.unwrap_err();
    assert!(matches!(err, DumpError::Database(_)));

    // nothing after the failing query runs
    let catalog = dumper.into_inner();
    assert_eq!(catalog.queries.last().map(String::as_str), Some("indexes:posts"));
}

#[tokio::test]
async fn test_composite_foreign_key_rows() {
    let catalog = FixtureCatalog::new()
        .tables(&["line_items"])
        .respond(
            "columns:line_items",
            vec![
                pg_column("order_id", "integer", "NO", None),
                pg_column("order_rev", "integer", "NO", None),
            ],
        )
        .respond(
            "foreign_keys:line_items",
            vec![
                pg_foreign_key("orders", "order_id", "id", "a", "a"),
                pg_foreign_key("orders", "order_rev", "rev", "a", "a"),
            ],
        );
    let mut dumper = PostgresDumper::with_grammar(catalog, FixtureGrammar);
    let tables = dumper.dump_tables().await.unwrap();

    assert_eq!(
        &tables[0].statements[2..],
        [
            "self.foreign('order_id').references('id').on('orders').on_update('restrict').on_delete('restrict')",
            "self.foreign('order_rev').references('rev').on('orders').on_update('restrict').on_delete('restrict')",
        ]
    );
}
