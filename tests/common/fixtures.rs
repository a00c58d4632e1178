// Test fixtures for integration testing

use std::path::PathBuf;
use tempfile::TempDir;
use verselink::core::store::read_verses_tsv;
use verselink::core::types::Verse;

/// King James Version excerpt (book column mixes numbers and names)
#[allow(dead_code)] // Used in integration tests
pub const KJV_TSV: &str = "\
# book\tchapter\tverse\ttext
1\t1\t1\tIn the beginning God created the heaven and the earth.
1\t1\t2\tAnd the earth was without form, and void; and darkness was upon the face of the deep. And the Spirit of God moved upon the face of the waters.
1\t1\t3\tAnd God said, Let there be light: and there was light.
Deuteronomy\t6\t5\tAnd thou shalt love the LORD thy God with all thine heart, and with all thy soul, and with all thy might.
1 Samuel\t1\t1\tNow there was a certain man of Ramathaimzophim, of mount Ephraim, and his name was Elkanah.
19\t23\t1\tThe LORD is my shepherd; I shall not want.
19\t23\t2\tHe maketh me to lie down in green pastures: he leadeth me beside the still waters.
John\t3\t16\tFor God so loved the world, that he gave his only begotten Son, that whosoever believeth in him should not perish, but have everlasting life.
John\t3\t17\tFor God sent not his Son into the world to condemn the world; but that the world through him might be saved.
John\t3\t18\tHe that believeth on him is not condemned: but he that believeth not is condemned already, because he hath not believed in the name of the only begotten Son of God.
45\t8\t28\tAnd we know that all things work together for good to them that love God, to them who are the called according to his purpose.
62\t4\t8\tHe that loveth not knoweth not God; for God is love.
";

/// World English Bible excerpt
#[allow(dead_code)] // Used in integration tests
pub const WEB_TSV: &str = "\
19\t23\t1\tYahweh is my shepherd: I shall lack nothing.
43\t3\t16\tFor God so loved the world, that he gave his one and only Son, that whoever believes in him should not perish, but have eternal life.
62\t4\t8\tHe who doesn't love doesn't know God, for God is love.
";

/// Parse a fixture into verses
#[allow(dead_code)] // Used in integration tests
pub fn verses(tsv: &str, version: &str) -> Vec<Verse> {
    read_verses_tsv(tsv.as_bytes(), version).expect("fixture must parse")
}

/// Directory of `<version>.tsv` files for import tests
#[allow(dead_code)] // Used in integration tests
pub struct VersionFiles {
    pub dir: TempDir,
    pub files: Vec<PathBuf>,
}

impl VersionFiles {
    /// kjv.tsv and web.tsv
    #[allow(dead_code)] // Used in integration tests
    pub fn standard() -> Self {
        Self::with_files(&[("kjv.tsv", KJV_TSV), ("web.tsv", WEB_TSV)])
    }

    /// Create version files with custom content
    #[allow(dead_code)] // Used in integration tests
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut created = Vec::new();

        for (name, content) in files {
            let path = dir.path().join(name);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).expect("Failed to create directories");
            }
            std::fs::write(&path, content).expect("Failed to write file");
            created.push(path);
        }

        Self {
            dir,
            files: created,
        }
    }

    #[allow(dead_code)] // Used in integration tests
    pub fn path(&self) -> &std::path::Path {
        self.dir.path()
    }
}

/// Small HTML page with references in and out of excluded containers
#[allow(dead_code)] // Used in integration tests
pub const SAMPLE_PAGE: &str = "<html><body>\
<h1>Sunday notes</h1>\
<p>See John 3:16 and Romans 8:28.</p>\
<p>Compare 1 Jn 4:8 with Deut 6:5-6.</p>\
<pre>John 3:17</pre>\
<p class=\"no-verselink\">Ps 23:1</p>\
<script>var ref = \"John 3:18\";</script>\
</body></html>";
