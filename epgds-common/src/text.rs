//! Programme title/description text normalization
//!
//! EPG strings arrive with full-width alphanumerics, ARIB enclosed-character
//! marks ([字], [再], ...) and broadcaster frame names (アニメ/ドラマ prefixes)
//! baked in. `format_string` unifies the character repertoire; `remove_symbols`
//! strips the marks and frame noise for the `*_without_symbols` fields.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

/// Full-width digits/letters/symbols and their half-width counterparts.
/// A few half-width symbols go the other way because the full-width form is
/// the one EDCB emits consistently.
static FORMAT_MAP: Lazy<HashMap<char, char>> = Lazy::new(|| {
    const ZENKAKU: &str = "０１２３４５６７８９ＡＢＣＤＥＦＧＨＩＪＫＬＭＮＯＰＱＲＳＴＵＶＷＸＹＺａｂｃｄｅｆｇｈｉｊｋｌｍｎｏｐｑｒｓｔｕｖｗｘｙｚ＂＃＄％＆＇（）＋，－．／：；＜＝＞［＼］＾＿｀｛｜｝　";
    const HANKAKU: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz\"#$%&'()+,-./:;<=>[\\]^_`{|} ";

    let mut map: HashMap<char, char> = ZENKAKU.chars().zip(HANKAKU.chars()).collect();
    map.extend([
        ('!', '！'),
        ('?', '？'),
        ('*', '＊'),
        ('~', '～'),
        // music sharp to hash
        ('♯', '#'),
        // wave dash to full-width tilde, matching the EDCB decoder
        ('〜', '～'),
    ]);
    map
});

/// Replace full-width alphanumerics and symbols with a uniform repertoire.
pub fn format_string(input: &str) -> String {
    input
        .chars()
        .map(|c| FORMAT_MAP.get(&c).copied().unwrap_or(c))
        .collect()
}

/// ARIB enclosed characters (Unicode squared-CJK code points emitted by the
/// EDCB Unicode decoder) and their bracketed ASCII forms.
static ENCLOSED_MAP: Lazy<HashMap<char, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ('\u{1F14A}', "[HV]"),
        ('\u{1F14C}', "[SD]"),
        ('\u{1F13F}', "[P]"),
        ('\u{1F146}', "[W]"),
        ('\u{1F14B}', "[MV]"),
        ('\u{1F210}', "[手]"),
        ('\u{1F211}', "[字]"),
        ('\u{1F212}', "[双]"),
        ('\u{1F213}', "[デ]"),
        ('\u{1F142}', "[S]"),
        ('\u{1F214}', "[二]"),
        ('\u{1F215}', "[多]"),
        ('\u{1F216}', "[解]"),
        ('\u{1F14D}', "[SS]"),
        ('\u{1F131}', "[B]"),
        ('\u{1F13D}', "[N]"),
        ('\u{1F217}', "[天]"),
        ('\u{1F218}', "[交]"),
        ('\u{1F219}', "[映]"),
        ('\u{1F21A}', "[無]"),
        ('\u{1F21B}', "[料]"),
        ('\u{1F21C}', "[前]"),
        ('\u{1F21D}', "[後]"),
        ('\u{1F21E}', "[再]"),
        ('\u{1F21F}', "[新]"),
        ('\u{1F220}', "[初]"),
        ('\u{1F221}', "[終]"),
        ('\u{1F222}', "[生]"),
        ('\u{1F223}', "[販]"),
        ('\u{1F224}', "[声]"),
        ('\u{1F225}', "[吹]"),
        ('\u{1F14E}', "[PPV]"),
        ('\u{1F200}', "[ほか]"),
    ])
});

/// Broadcast marks that may appear bracketed in titles
const MARKS: &[&str] = &[
    "新", "終", "再", "交", "映", "手", "声", "多", "副", "字", "文", "CC", "OP", "二", "S", "B",
    "SS", "無", "無料", "C", "S1", "S2", "S3", "MV", "双", "デ", "D", "N", "W", "P", "H", "HV",
    "SD", "天", "解", "料", "前", "後", "初", "生", "販", "吹", "PPV", "演", "移", "他", "収",
    "・", "英", "韓", "中", "字/日", "字/日英", "3D", "2K", "4K", "8K", "5.1", "7.1", "22.2",
    "60P", "120P", "d", "HC", "HDR", "SHV", "UHD", "VOD", "配",
];

fn mark_alternation() -> String {
    MARKS
        .iter()
        .map(|mark| regex::escape(mark))
        .collect::<Vec<_>>()
        .join("|")
}

static PAREN_MARK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\((二|字|再)\)").expect("mark pattern compiles"));
static BRACKET_MARK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\[({})\]", mark_alternation())).expect("mark pattern compiles")
});
static SUMITSUKI_MARK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)【({})】", mark_alternation())).expect("mark pattern compiles")
});

/// Programme frame names and other noise stripped from titles.
/// Applied in order; replacements are literal.
const NOISE_RULES: &[(&str, &str)] = &[
    (r"※2K放送", ""),
    (r"【無料】", ""),
    (r"【KNTV】", ""),
    (r"【中】", ""),
    (r"【韓】", ""),
    (r"【字幕】", ""),
    (r"【字幕スーパー】", ""),
    (r"【解説放送】", ""),
    (r"\[釣り\]", ""),
    (r"<独占>", ""),
    (r"【独占】", ""),
    (r"<独占放送>", ""),
    (r"【独占放送】", ""),
    (r"【最新作】", ""),
    (r"【歌詞入り】", ""),
    (r"【.{0,8}ドラマ】", ""),
    (r"【ドラマ.{0,8}】", ""),
    (r"【.{0,8}夜ドラ.{0,8}】", ""),
    (r"【.{0,8}昼ドラ.{0,8}】", ""),
    (r"【.{0,8}時代劇.{0,8}】", ""),
    (r"【.{0,8}一挙.{0,8}】", ""),
    (r"【.*?日本初.*?】", ""),
    (r"【.*?初放送.*?】", ""),
    (r"<.*?一挙.*?>", ""),
    (r"^特: ", ""),
    (r"^アニメ ", ""),
    (r"^アニメ・", ""),
    (r"^アニメ「", "「"),
    (r"^アニメ『", "『"),
    (r"^アニメ\d{1,2}・", ""),
    (r"^アニメ\d{1,2}", ""),
    (r"^テレビアニメ ", ""),
    (r"^テレビアニメ・", ""),
    (r"^テレビアニメ「", "「"),
    (r"^テレビアニメ『", "『"),
    (r"^TVアニメ ", ""),
    (r"^TVアニメ・", ""),
    (r"^TVアニメ「", "「"),
    (r"^TVアニメ『", "『"),
    (r"^ドラマ ", ""),
    (r"^ドラマ・", ""),
    (r"^ドラマ「", "「"),
    (r"^ドラマ『", "『"),
    (r"^ドラマシリーズ ", ""),
    (r"^ドラマシリーズ・", ""),
    (r"^ドラマシリーズ「", "「"),
    (r"^ドラマシリーズ『", "『"),
    (r"^【連続テレビ小説】", "連続テレビ小説 "),
    (r"^【(朝|昼|夕|夕方|夜)アンコール】", ""),
    (r"^ドラマ\d{1,2}・", ""),
    (r"^ドラマ\d{1,2}", ""),
    (r"^ドラマ(\+|パラビ|NEXT|プレミア23|チューズ！|ストリーム) ", ""),
    (r"^ドラマ(\+|パラビ|NEXT|プレミア23|チューズ！|ストリーム)・", ""),
    (r"^ドラマ(\+|パラビ|NEXT|プレミア23|チューズ！|ストリーム)「", "「"),
    (r"^ドラマ(\+|パラビ|NEXT|プレミア23|チューズ！|ストリーム)『", "『"),
    (r"^<BSフジ.*?>", ""),
    (r"^<名作ドラマ劇場>", ""),
    (r"^<(月|火|水|木|金|土|日)ドラ★イレブン>", ""),
    (r"^<午後の名作ドラマ劇場>", ""),
    (r"^(月|火|水|木|金|土|日)(ドラ|曜劇場|曜ドラマ|曜ナイトドラマ) ", ""),
    (r"^(月|火|水|木|金|土|日)(ドラ|曜劇場|曜ドラマ|曜ナイトドラマ)・", ""),
    (r"^(月|火|水|木|金|土|日)(ドラ|曜劇場|曜ドラマ|曜ナイトドラマ)「", "「"),
    (r"^(月|火|水|木|金|土|日)(ドラ|曜劇場|曜ドラマ|曜ナイトドラマ)『", "『"),
    (r"^(月|火|水|木|金|土|日)(ドラ|曜劇場|曜ドラマ|曜ナイトドラマ)\d{1,2}・", ""),
    (r"^(月|火|水|木|金|土|日)(ドラ|曜劇場|曜ドラマ|曜ナイトドラマ)\d{1,2}", ""),
    (r"^(真夜中ドラマ|シンドラ|ドラマL|Zドラマ|よるおびドラマ|金曜ドラマDEEP) ", ""),
    (r"^(真夜中ドラマ|シンドラ|ドラマL|Zドラマ|よるおびドラマ|金曜ドラマDEEP)・", ""),
    (r"^(真夜中ドラマ|シンドラ|ドラマL|Zドラマ|よるおびドラマ|金曜ドラマDEEP)「", "「"),
    (r"^(真夜中ドラマ|シンドラ|ドラマL|Zドラマ|よるおびドラマ|金曜ドラマDEEP)『", "『"),
    (r"◆ドラマイズム】", "】"),
    (r"<韓ドラ>", ""),
    (r"【韓ドラ】", ""),
    (r"^韓ドラ ", ""),
    (r"^韓ドラ・", ""),
    (r"^韓ドラ「", "「"),
    (r"^韓ドラ『", "『"),
    (r"^タイドラマ ", ""),
    (r"^タイドラマ・", ""),
    (r"^タイドラマ「", "「"),
    (r"^タイドラマ『", "『"),
    (r"^韓(☆|◆|◇)", ""),
    (r"^韓ドラ(☆|◆|◇)", ""),
    (r"^華(☆|◆|◇)", ""),
    (r"^華ドラ(☆|◆|◇)", ""),
    (r"^(中国|中華|韓国|韓ドラ)時代劇(☆|◆|◇)", ""),
    (r"^(韓流プレミア|韓流朝ドラ\d{1,2}) ", ""),
    (r"^韓流プレミア・", ""),
    (r"^韓流プレミア「", "「"),
    (r"^韓流プレミア『", "『"),
    (r"^(中|韓)(国|流)ドラマ ", ""),
    (r"^(中|韓)(国|流)ドラマ・", ""),
    (r"^(中|韓)(国|流)ドラマ「", "「"),
    (r"^(中|韓)(国|流)ドラマ『", "『"),
    (r"^(中|韓)(国|流)ドラマ【", "【"),
    (r"<時代劇.*?>", ""),
    (r"\([0-9][0-9][0-9]ch(時代劇|中国ドラマ|韓国ドラマ)\)", ""),
    (r"【時代劇】", ""),
    (r"^時代劇 ", ""),
    (r"^時代劇・", ""),
    (r"^時代劇「", "「"),
    (r"^時代劇『", "『"),
    (r"^(中|韓)(国|流|国ファンタジー)時代劇 ", ""),
    (r"^(中|韓)(国|流|国ファンタジー)時代劇・", ""),
    (r"^(中|韓)(国|流|国ファンタジー)時代劇「", "「"),
    (r"^(中|韓)(国|流|国ファンタジー)時代劇『", "『"),
    (r"^日5", ""),
    (r"^アニメA・", ""),
    (r"^<アニメギルド>", ""),
    (r"<(M|T|W)ナイト>", ""),
    (r"<ノイタミナ>", ""),
    (r"<\+Ultra>", ""),
    (r"<B8station>", ""),
    (r"AnichU", ""),
    (r"FRIDAY ANIME NIGHT", ""),
    (r"^(月|火|水|木|金|土|日)曜アニメ・水もん ", ""),
    (
        r"【(アニメ|アニメシャワー|アニメ特区|アニメイズム|スーパーアニメイズム|ヌマニメーション|ANiMAZiNG！！！|ANiMAZiNG2！！！)】",
        "",
    ),
];

static NOISE_REGEXES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    NOISE_RULES
        .iter()
        .map(|(pattern, replacement)| {
            (
                Regex::new(pattern).expect("noise rule compiles"),
                *replacement,
            )
        })
        .collect()
});

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("pattern compiles"));

/// Strip enclosed characters, bracketed broadcast marks, and programme frame
/// names, then collapse whitespace.
pub fn remove_symbols(input: &str) -> String {
    // Enclosed code points become bracketed tags so one mark pass covers both
    let mut result = String::with_capacity(input.len());
    for c in input.chars() {
        match ENCLOSED_MAP.get(&c) {
            Some(tag) => result.push_str(tag),
            None => result.push(c),
        }
    }

    let result = PAREN_MARK_RE.replace_all(&result, " ");
    let result = BRACKET_MARK_RE.replace_all(&result, " ");
    let mut result = SUMITSUKI_MARK_RE.replace_all(&result, " ").into_owned();

    for (re, replacement) in NOISE_REGEXES.iter() {
        result = re.replace_all(&result, *replacement).into_owned();
    }

    WHITESPACE_RE.replace_all(result.trim(), " ").into_owned()
}
