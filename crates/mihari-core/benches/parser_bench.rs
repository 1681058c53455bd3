use std::sync::Arc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use mihari_core::BoxError;
use mihari_core::parser::EpisodeParser;
use mihari_core::types::{
    FetchKind, FetchOptions, GroupRef, Resolution, Show, ShowLookup, SourceDefaults, SourceRef,
};

struct StaticShow(Arc<Show>);

impl ShowLookup for StaticShow {
    fn find_show(&self, _file_name: &str) -> Result<Option<Arc<Show>>, BoxError> {
        Ok(Some(self.0.clone()))
    }
}

fn bench_source() -> SourceRef {
    let show = Arc::new(Show {
        name: "Some Anime".to_owned(),
        group_id: "show-1".to_owned(),
        wanted_resolutions: [Resolution::HD720, Resolution::FHD1080].into(),
        releasers: Default::default(),
    });
    SourceRef {
        fetch_kind: FetchKind::Torrent,
        defaults: SourceDefaults::default(),
        group: GroupRef {
            key: "subs".to_owned(),
            name: "Subs United".to_owned(),
            shows: Arc::new(StaticShow(show)),
        },
    }
}

fn options() -> FetchOptions {
    FetchKind::Torrent.options_for("magnet:?xt=bench")
}

fn bench_parse_wanted(c: &mut Criterion) {
    let parser = EpisodeParser::new().unwrap();
    let source = bench_source();

    let inputs = vec![
        "[Subs] Some Anime - 24 (1080p) [A1B2C3D4].mkv",
        "[Subs]_Some_Anime_-_28v2_[1080p][5765F5A5].mkv",
        "Some Anime S03E01 [BD 1280x720 x264 AAC].mkv",
        "Some.Anime.EP1084.1080p.mkv",
        "(TVアニメ) Some Anime 第12話 [720p 123A4BC5].mkv",
    ];

    c.bench_function("parse_wanted_single", |b| {
        b.iter(|| {
            parser
                .parse_wanted_episode(black_box(inputs[0]), options(), &source)
                .unwrap()
        });
    });

    c.bench_function("parse_wanted_batch_5", |b| {
        b.iter(|| {
            for input in &inputs {
                let _ = parser
                    .parse_wanted_episode(black_box(input), options(), &source)
                    .unwrap();
            }
        });
    });

    c.bench_function("parse_unparsable_cached", |b| {
        parser
            .parse_wanted_episode("definitely not an episode name", options(), &source)
            .unwrap();
        b.iter(|| {
            parser
                .parse_wanted_episode(
                    black_box("definitely not an episode name"),
                    options(),
                    &source,
                )
                .unwrap()
        });
    });
}

criterion_group!(benches, bench_parse_wanted);
criterion_main!(benches);
