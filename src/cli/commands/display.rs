use crate::models::Media;
use crate::models::format::{
    display_title, format_media_format, format_score, format_status, format_year,
};

pub fn print_header(title: &str) {
    println!();
    println!("{title}");
    println!("{:-<60}", "");
}

/// One numbered entry of a result list.
pub fn print_media_line(index: usize, media: &Media) {
    let title = display_title(&media.title);
    let eps = media
        .episodes
        .map_or_else(|| "? eps".to_string(), |e| format!("{e} eps"));

    println!("[{}] {} ({})", index + 1, title, eps);

    if let Some(romaji) = media.title.romaji.as_deref()
        && !romaji.is_empty()
        && romaji != title
    {
        println!("    Romaji: {romaji}");
    }

    println!(
        "    {} | {} | {} | Score: {} | ID: {}",
        format_media_format(media.format),
        format_status(media.status),
        format_year(media.start_date.as_ref()),
        format_score(media.average_score),
        media.id
    );

    if !media.genres.is_empty() {
        println!("    Genres: {}", media.genres.join(", "));
    }
}

pub fn print_media_list(media: &[Media]) {
    for (i, anime) in media.iter().enumerate() {
        print_media_line(i, anime);
    }
}
