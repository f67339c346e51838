//! User-facing texts. Markdown in the Telegram flavor (`*bold*`, `` `code` ``).

use coach_core::board::files_by_kind;
use coach_core::model::{PieceFact, PracticeMode, Rank, Square};
use coach_core::scoring::{GradeBand, TEST_LENGTH, Verdict};

pub const SCORING_RULES: &str = "*Как считается:*\n\
    • 2 балла - правильно и фигура, и цвет\n\
    • 1 балл - правильно только что-то одно\n\
    • 0 баллов - ошибка в обоих";

const ANSWER_EXAMPLE: &str = "(например: `Б ладья` или `черный конь`)";

#[must_use]
pub fn welcome() -> String {
    "👑 *Тренер для игры в шахматы вслепую*\n\n\
     Я помогу вам запомнить расположение фигур на доске!\n\n\
     *Как это работает:*\n\
     1. Я покажу координату клетки (например, e1)\n\
     2. Вы должны назвать фигуру и цвет, который там стоит в начале игры\n\
     3. Я проверю ваш ответ и дам обратную связь\n\n\
     Выберите режим тренировки:"
        .to_string()
}

#[must_use]
pub fn choose_mode() -> String {
    "Выберите режим тренировки:".to_string()
}

fn rank_section(rank: Rank) -> String {
    let title = match rank {
        Rank::First => "*1-я горизонталь (БЕЛЫЕ фигуры):*",
        Rank::Eighth => "*8-я горизонталь (ЧЁРНЫЕ фигуры):*",
    };
    let mut lines = vec![title.to_string()];
    for (kind, files) in files_by_kind() {
        let squares: Vec<String> = files
            .iter()
            .map(|file| Square::from_parts(*file, rank).code())
            .collect();
        lines.push(format!(
            "• {} - {} ({})",
            squares.join(", "),
            kind.name(),
            kind.symbol()
        ));
    }
    lines.join("\n")
}

/// Reference card: pieces per square, accepted answer formats, modes.
#[must_use]
pub fn help() -> String {
    format!(
        "*📚 Справка по боту*\n\n\
         {}\n\n\
         {}\n\n\
         *Форматы ответа:*\n\
         • Цвет: Б, белый, Ч, черный\n\
         • Фигура: ладья, конь, слон, ферзь, король\n\
         • Или одной строкой: 'Б ладья', 'черный конь'\n\n\
         *Режимы:*\n\
         • 🎮 Легкий - с подсказкой\n\
         • 🎯 Средний - без подсказки\n\
         • ⚡ Сложный - ввод одной строкой\n\
         • 📝 Тест - {TEST_LENGTH} вопросов с подсчетом результатов",
        rank_section(Rank::First),
        rank_section(Rank::Eighth),
    )
}

#[must_use]
pub fn practice_question(mode: PracticeMode, square: Square) -> String {
    match mode {
        PracticeMode::Easy => {
            let hint = match square.rank() {
                Rank::First => "1-я горизонталь (белые)",
                Rank::Eighth => "8-я горизонталь (черные)",
            };
            format!(
                "*Координата:* `{square}`\n*Подсказка:* {hint}\n\n\
                 Введите *цвет* и *фигуру* {ANSWER_EXAMPLE}"
            )
        }
        PracticeMode::Medium => format!(
            "*Координата:* `{square}`\n\n\
             Введите *цвет* и *фигуру* {ANSWER_EXAMPLE}"
        ),
        PracticeMode::Hard => format!(
            "*Координата:* `{square}`\n\n\
             Введите ответ *одной строкой* {ANSWER_EXAMPLE}"
        ),
    }
}

#[must_use]
pub fn practice_feedback(verdict: Verdict, fact: &PieceFact) -> String {
    match verdict {
        Verdict::Correct => format!("✅ *Правильно!* {fact}"),
        Verdict::PieceOnly => format!("⚠️ *Фигура угадана, цвет нет!*\nПравильно: {fact}"),
        Verdict::ColorOnly => format!("⚠️ *Цвет угадан, фигура нет!*\nПравильно: {fact}"),
        Verdict::Wrong => format!("❌ *Неправильно!*\nПравильно: {fact}"),
    }
}

#[must_use]
pub fn practice_finished() -> String {
    "Тренировка завершена! Возвращаюсь в главное меню.".to_string()
}

#[must_use]
pub fn interrupted() -> String {
    "Тренировка прервана. Возвращаюсь в главное меню.".to_string()
}

#[must_use]
pub fn lost_question() -> String {
    "Что-то пошло не так. Давайте начнем заново.".to_string()
}

#[must_use]
pub fn test_intro() -> String {
    format!(
        "📝 *Начинаем тест! {TEST_LENGTH} вопросов.*\n\n\
         Отвечайте на вопросы. В конце увидите статистику.\n\
         Формат ответа: `цвет фигура` (например: `Б ладья`)"
    )
}

#[must_use]
pub fn test_question(number: u32, square: Square) -> String {
    format!(
        "*Вопрос {number}/{TEST_LENGTH}:*\n\
         Координата: `{square}`\n\n\
         Ваш ответ (цвет фигура):"
    )
}

#[must_use]
pub fn test_feedback(verdict: Verdict, fact: &PieceFact) -> String {
    if verdict.is_fully_correct() {
        "✅ Правильно!".to_string()
    } else {
        format!("❌ Неправильно. Правильно: {}", fact.short_answer())
    }
}

#[must_use]
pub fn test_result(correct: u32, asked: u32, percent: f64, band: GradeBand) -> String {
    format!(
        "{} *Результаты теста:*\n\n\
         Правильных ответов: *{correct}/{asked}*\n\
         Процент правильных: *{percent:.1}%*\n\n\
         {}",
        band.emoji(),
        band.comment()
    )
}

#[must_use]
pub fn no_stats() -> String {
    "У вас пока нет статистики. Начните тренировку!".to_string()
}

#[must_use]
pub fn stats(score: u32, max_score: u32, percent: f64) -> String {
    format!(
        "*📊 Ваша статистика:*\n\n\
         Накопленный балл: *{score}/{max_score}*\n\
         Процент правильных: *{percent:.1}%*\n\n\
         {SCORING_RULES}"
    )
}

#[must_use]
pub fn unknown_command() -> String {
    "Неизвестная команда. Доступно: /start, /help, /stats, /cancel".to_string()
}
