//! HTML views for the marketing site and the chat page.

use chrono::Local;
use maud::{ html, Markup, DOCTYPE };
use uuid::Uuid;

use crate::chat::ChatSession;
use crate::models::chat::{ ApiStatus, ChatMessage, Language, MessageSource, QuickAction, Sender };
use crate::models::site::{ FooterSection, HomeContent, NavLink, Plan, SiteContent };

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";
const BRAND: &str = "AWAL GPT";

fn layout(title: &str, description: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="fr" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                meta name="description" content=(description);
                title { (title) }
                script src=(TAILWIND_CDN) {}
            }
            body class="bg-white text-gray-900 antialiased" {
                (body)
            }
        }
    }
}

fn header(nav: &[NavLink]) -> Markup {
    html! {
        header class="sticky top-0 z-40 bg-white/90 backdrop-blur border-b border-gray-100" {
            div class="container mx-auto max-w-7xl px-4 py-4 flex items-center justify-between" {
                a href="/" class="flex items-center gap-2 font-bold text-xl" {
                    img src="/images/logo.png" alt="logo" width="32" height="12";
                    span { (BRAND) }
                }
                nav class="hidden lg:flex gap-8" {
                    @for link in nav {
                        a href=(link.href) class="text-lg hover:text-[#e10916]" { (link.label) }
                    }
                }
                div class="flex gap-3" {
                    a href="/signup" class="py-2 px-5 rounded-full border border-[#e10916] text-[#e10916]" { "Sign Up" }
                    a href="/chat" class="py-2 px-5 rounded-full bg-[#e10916] text-white" { "Chat" }
                }
            }
        }
    }
}

fn hero(home: &HomeContent) -> Markup {
    let hero = &home.hero;
    html! {
        section class="relative overflow-hidden bg-gradient-to-br from-[#f9f5f0] to-white" {
            div class="container mx-auto pt-24 pb-16 max-w-7xl px-4 grid grid-cols-12 items-center" {
                div class="col-span-12 lg:col-span-7" {
                    div class="py-2 px-5 bg-[#e10916]/15 rounded-full w-fit mb-6" {
                        p class="text-[#e10916] text-lg font-bold" { span class="text-2xl" { "ⵣ" } " " (hero.badge) }
                    }
                    h1 class="mb-4 text-5xl font-bold" {
                        span class="text-[#e10916]" { (hero.title_tifinagh) } " - " (hero.title)
                    }
                    p class="text-xl text-gray-600 mb-8 max-w-2xl" { (hero.lead) }
                    div class="flex flex-col sm:flex-row gap-4" {
                        a href="/chat" class="bg-[#e10916] text-white text-xl font-semibold py-5 px-12 rounded-full" { (hero.primary_cta) }
                        a href="#About" class="border-2 border-[#e10916] text-[#e10916] text-xl font-semibold py-5 px-12 rounded-full" { (hero.secondary_cta) }
                    }
                }
                div class="hidden lg:block lg:col-span-5" {
                    img src="/images/chatboot.png" alt="Chatbot Amazigh AWAL GPT" width="600" height="600" class="w-full";
                }
            }
        }
    }
}

fn about(home: &HomeContent) -> Markup {
    let about = &home.about;
    html! {
        section id="About" class="py-16" {
            div class="container mx-auto max-w-7xl px-4" {
                div class="p-12 bg-white rounded-3xl shadow-lg border border-gray-100" {
                    p class="text-center text-[#e10916] text-lg tracking-widest uppercase" { (about.kicker) }
                    h2 class="text-center pb-6 text-4xl font-bold" { (about.title) }
                    p class="text-center text-gray-600 max-w-3xl mx-auto mb-12 text-lg" { (about.intro) }
                    div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-3 gap-8" {
                        @for item in &about.features {
                            div class="bg-white rounded-3xl p-8 shadow-lg border border-gray-100" {
                                h5 class="mb-5 text-xl font-semibold" { (item.heading) }
                                p class="text-lg text-gray-600 mb-5" { (item.paragraph) }
                                a href="/chat" class="font-semibold text-[#e10916]" { (item.link) }
                            }
                        }
                    }
                    div class="mt-16 pt-12 border-t border-gray-200 grid grid-cols-2 md:grid-cols-4 gap-8" {
                        @for stat in &about.stats {
                            div class="text-center" {
                                p class="text-5xl font-bold text-[#e10916]" { (stat.value) }
                                p class="text-gray-600" { (stat.label) }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn dedicated(home: &HomeContent) -> Markup {
    let quote = &home.dedicated;
    html! {
        section id="Dedicated" class="py-16" {
            div class="container mx-auto max-w-7xl px-4 grid grid-cols-1 lg:grid-cols-12 gap-5 items-center" {
                div class="lg:col-span-6" {
                    img src="/images/man.png" alt="man-icon" width="416" height="530" class="mx-auto rounded-3xl";
                }
                div class="lg:col-span-6" {
                    h2 class="text-4xl font-bold" { (quote.quote) }
                    p class="text-xl font-medium text-black/55 mt-5" { (quote.body) }
                    h5 class="mt-12 text-lg font-semibold" { (quote.author) }
                }
            }
        }
    }
}

fn faq(home: &HomeContent) -> Markup {
    let faq = &home.faq;
    html! {
        section id="FAQ" class="py-4" {
            div class="container mx-auto max-w-7xl px-4" {
                div class="rounded-2xl py-24 px-4 bg-gradient-to-r from-[#e10916] to-[#b0070f]" {
                    p class="text-lg text-white text-center mb-6" { (faq.kicker) }
                    h2 class="text-white text-center text-4xl font-bold max-w-3xl mx-auto" { (faq.title) }
                    div class="pt-16" {
                        @for item in &faq.items {
                            details class="mx-auto max-w-5xl rounded-2xl p-8 bg-white mb-5 shadow-lg" {
                                summary class="cursor-pointer text-xl font-medium" { (item.question) }
                                div class="text-base text-gray-600 pt-4 mt-6 border-t border-gray-200" { (item.answer) }
                            }
                        }
                    }
                    div class="text-center mt-12" {
                        p class="text-white/80 mb-6" { "Vous avez d'autres questions ?" }
                        a href={ "mailto:" (faq.contact_email) } class="inline-block text-xl py-4 px-12 font-semibold text-[#e10916] bg-white rounded-full" {
                            "Contactez notre équipe"
                        }
                    }
                }
            }
        }
    }
}

fn plan_card(plan: &Plan) -> Markup {
    html! {
        div class="rounded-3xl p-8 border border-gray-200 shadow-lg" {
            h3 class="text-2xl font-bold mb-4" { (plan.heading) }
            p class="text-4xl font-bold text-[#e10916]" {
                "$" (plan.price.monthly) span class="text-base text-gray-500" { " / mois, " (plan.user) }
            }
            p class="text-gray-500 mb-6" { "$" (plan.price.yearly) " / an" }
            ul class="space-y-2" {
                @for feature in plan.features.iter() {
                    li { "✓ " (feature) }
                }
            }
        }
    }
}

fn plans(plans: &[Plan]) -> Markup {
    html! {
        section id="services-section" class="py-16" {
            div class="container mx-auto max-w-5xl px-4" {
                h2 class="text-center text-4xl font-bold mb-12" { "Plans" }
                div class="grid grid-cols-1 md:grid-cols-2 gap-8" {
                    @for plan in plans { (plan_card(plan)) }
                }
            }
        }
    }
}

fn join(home: &HomeContent) -> Markup {
    let join = &home.join;
    html! {
        section id="join" class="py-16 bg-gradient-to-br from-white to-[#f9f5f0]" {
            div class="container mx-auto max-w-7xl px-4 text-center" {
                p class="text-[#e10916] text-lg tracking-widest uppercase" { (join.kicker) }
                h2 class="my-6 text-4xl font-bold" { (join.title) }
                p class="text-gray-600 max-w-3xl mx-auto" { (join.body) }
                form action="/signup" method="get" class="mx-auto max-w-4xl pt-5 sm:flex items-center gap-3" {
                    input type="text" name="name" placeholder="Votre nom" autocomplete="off" class="flex-1 my-4 py-4 px-6 rounded-full border border-gray-200";
                    input type="email" name="email" placeholder="Votre email" autocomplete="off" class="flex-1 my-4 py-4 px-6 rounded-full border border-gray-200";
                    button type="submit" class="text-xl text-white font-semibold rounded-full bg-[#e10916] py-4 px-12" { "S'inscrire →" }
                }
                p class="text-gray-500 text-sm mt-8" {
                    "Déjà " span class="text-[#e10916] font-semibold" { (join.members) } " membres de la communauté Amazighe nous ont rejoints"
                }
            }
        }
    }
}

fn footer(sections: &[FooterSection], copyright: &str) -> Markup {
    html! {
        footer class="bg-black text-white" {
            div class="container mx-auto max-w-7xl px-4 pt-16 pb-12 grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-12 gap-10" {
                div class="lg:col-span-4" {
                    h4 class="text-3xl mb-4" { (BRAND) }
                    div class="flex gap-3" {
                        @for (icon, alt) in [("facebook", "facebook"), ("twitter", "twitter"), ("instagram", "instagram")] {
                            a href="#" { img src={ "/images/" (icon) ".svg" } alt=(alt) width="25" height="20"; }
                        }
                    }
                }
                @for section in sections {
                    div class="lg:col-span-4" {
                        p class="text-xl font-extrabold mb-9" { (section.section) }
                        ul {
                            @for link in &section.links {
                                li class="mb-5" { a href=(link.href) class="text-lg hover:text-white/60" { (link.label) } }
                            }
                        }
                    }
                }
            }
            div class="container mx-auto max-w-7xl px-4 py-5 border-t border-white/30 flex justify-between" {
                p class="text-lg" { (copyright) }
                div class="flex gap-6" {
                    a href="/" { "Privacy policy" }
                    a href="/" { "Terms & conditions" }
                }
            }
        }
    }
}

pub fn home_page(content: &SiteContent) -> Markup {
    let home = &content.home;
    layout(
        &home.title,
        &home.description,
        html! {
            (header(&content.data.header_data))
            main {
                (hero(home))
                (about(home))
                (dedicated(home))
                (faq(home))
                (plans(&content.data.plans_data))
                (join(home))
            }
            (footer(&content.data.footer_links_data, &home.copyright))
        }
    )
}

pub fn signup_page(content: &SiteContent, name: &str, email: &str) -> Markup {
    let home = &content.home;
    layout(
        "Sign Up | AWAL GPT",
        &home.description,
        html! {
            (header(&content.data.header_data))
            main class="py-24" {
                div class="mx-auto max-w-md rounded-3xl p-10 shadow-lg border border-gray-100" {
                    h1 class="text-3xl font-bold mb-8 text-center" { "Créer un compte" }
                    form method="get" action="/signup" class="space-y-4" {
                        input type="text" name="name" value=(name) placeholder="Votre nom" class="w-full py-3 px-5 rounded-xl border border-gray-300";
                        input type="email" name="email" value=(email) placeholder="Votre email" class="w-full py-3 px-5 rounded-xl border border-gray-300";
                        input type="password" name="password" placeholder="Mot de passe" class="w-full py-3 px-5 rounded-xl border border-gray-300";
                        button type="submit" class="w-full py-3 rounded-xl bg-[#e10916] text-white font-semibold" { "S'inscrire" }
                    }
                    p class="text-center text-sm text-gray-500 mt-6" {
                        "Déjà membre ? " a href="/chat" class="text-[#e10916]" { "Ouvrir le chat" }
                    }
                }
            }
            (footer(&content.data.footer_links_data, &home.copyright))
        }
    )
}

fn status_dot(status: ApiStatus) -> &'static str {
    match status {
        ApiStatus::Online => "bg-green-500",
        ApiStatus::Offline => "bg-red-500",
        ApiStatus::Checking => "bg-yellow-500",
    }
}

fn status_badge(status: ApiStatus) -> &'static str {
    match status {
        ApiStatus::Online => "bg-green-100 text-green-800",
        ApiStatus::Offline => "bg-red-100 text-red-800",
        ApiStatus::Checking => "bg-yellow-100 text-yellow-800",
    }
}

fn message_bubble(message: &ChatMessage, show_steps: bool) -> Markup {
    let is_user = message.sender == Sender::User;
    let time = message.timestamp.with_timezone(&Local).format("%H:%M").to_string();
    html! {
        div class={ "flex " @if is_user { "justify-end" } @else { "justify-start" } } {
            div class={
                "max-w-[85%] lg:max-w-[75%] rounded-2xl p-4 "
                @if is_user { "bg-[#e10916] text-white rounded-br-none" }
                @else { "bg-white border border-gray-200 text-gray-800 rounded-bl-none" }
            } {
                div class="flex items-center gap-2 mb-2" {
                    span class="text-sm font-medium" { @if is_user { "Vous" } @else { (BRAND) } }
                    span class="text-xs opacity-70" { (time) }
                    @match message.source() {
                        Some(MessageSource::Backend) => span class="text-xs bg-green-100 text-green-800 px-2 py-1 rounded-full" { "DeepSeek" },
                        Some(MessageSource::Fallback) => span class="text-xs bg-yellow-100 text-yellow-800 px-2 py-1 rounded-full" { "Local" },
                        Some(MessageSource::System) => span class="text-xs bg-gray-100 text-gray-700 px-2 py-1 rounded-full" { "Système" },
                        None => {},
                    }
                }
                div class="whitespace-pre-wrap" { (message.text) }
                @if show_steps {
                    @if let Some(meta) = &message.metadata {
                        @if !meta.steps.is_empty() {
                            div class="mt-3 pt-3 border-t border-gray-200 text-xs text-gray-600 space-y-2" {
                                @for step in &meta.steps {
                                    div {
                                        p class="font-semibold" { (step.label) }
                                        pre class="whitespace-pre-wrap break-words" { (step.detail.to_string()) }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn post_button(action: &str, label: &str, class: &str) -> Markup {
    html! {
        form method="post" action=(action) {
            button type="submit" class=(class) { (label) }
        }
    }
}

/// `prefill` replaces the stored draft in the input box without touching the session.
pub fn chat_page(id: Uuid, session: &ChatSession, prefill: Option<&str>) -> Markup {
    let base = format!("/chat/{}", id);
    let status = session.api_status();
    let online = status == ApiStatus::Online;
    layout(
        "AWAL GPT - Chat",
        "Discutez avec AWAL GPT, votre assistant Amazigh",
        html! {
            div class="h-screen bg-gradient-to-br from-gray-50 to-gray-100 flex overflow-hidden" {
                @if session.sidebar_open() {
                    aside class="w-80 flex-shrink-0 flex flex-col bg-white border-r border-gray-200" {
                        div class="p-4 border-b border-gray-200" {
                            div class="flex items-center justify-between mb-4" {
                                div {
                                    div class="font-bold" { (BRAND) }
                                    div class="text-xs text-gray-500" { "Chatbot Amazigh" }
                                }
                                (post_button(&format!("{}/sidebar", base), "✕", "p-2 hover:bg-gray-100 rounded-lg"))
                            }
                            (post_button(&format!("{}/new", base), "+ Nouveau chat", "w-full bg-[#e10916] text-white py-3 rounded-xl"))
                        }
                        div class="flex-1 overflow-y-auto p-3" {
                            div class="text-sm font-semibold text-gray-500 mb-3 px-2" { "HISTORIQUE" }
                            @for conv in session.conversations() {
                                form method="post" action={ (base) "/conversations/" (conv.id) } {
                                    button type="submit" class={
                                        "w-full text-left p-3 rounded-xl "
                                        @if conv.id == session.active_conversation() { "bg-[#e10916]/10 border border-[#e10916]/20" }
                                        @else { "hover:bg-gray-100" }
                                    } {
                                        div class="font-medium truncate" { (conv.title) }
                                        div class="text-sm text-gray-500 truncate mt-1" { (conv.last_message) }
                                    }
                                }
                            }
                        }
                        div class="p-4 border-t border-gray-200" {
                            div class="flex items-center gap-3 mb-4" {
                                div class={ "w-2 h-2 rounded-full " (status_dot(status)) } {}
                                div {
                                    div class="font-medium" { "Backend API" }
                                    div class="text-xs text-gray-500" { (status.label()) }
                                }
                            }
                            div class="text-xs font-medium text-gray-500 mb-2" { "LANGUE" }
                            form method="post" action={ (base) "/language" } class="flex gap-1" {
                                @for lang in Language::ALL {
                                    button type="submit" name="language" value=(lang.code()) class={
                                        "flex-1 py-2 text-sm rounded-lg "
                                        @if lang == session.language() { "bg-[#e10916] text-white" } @else { "bg-gray-100" }
                                    } { (lang.label()) }
                                }
                            }
                        }
                    }
                } @else {
                    aside class="p-4 flex flex-col items-center gap-4 bg-white border-r border-gray-200" {
                        (post_button(&format!("{}/sidebar", base), "☰", "p-2 hover:bg-gray-100 rounded-lg"))
                        (post_button(&format!("{}/new", base), "+", "p-2 hover:bg-gray-100 rounded-lg"))
                    }
                }

                div class="flex-1 flex flex-col overflow-hidden" {
                    div class="border-b border-gray-200 bg-white p-4 flex items-center justify-between" {
                        div {
                            div class="font-bold" { (BRAND) }
                            div class="text-xs text-gray-500" {
                                "Assistant Amazigh • " @if online { "✅ Backend Connecté" } @else { "⚠️ Mode local" }
                            }
                        }
                        div class="flex items-center gap-2" {
                            (post_button(
                                &format!("{}/steps", base),
                                if session.show_processing_steps() { "Masquer les étapes" } else { "Étapes de traitement" },
                                "px-3 py-1 rounded-full text-xs border border-gray-200"
                            ))
                            div class={ "px-3 py-1 rounded-full text-xs font-medium " (status_badge(status)) } { (status.badge()) }
                        }
                    }

                    div id="messages" class="flex-1 overflow-y-auto p-4 md:p-6" {
                        div class="max-w-3xl mx-auto space-y-6" {
                            @for message in session.messages() {
                                (message_bubble(message, session.show_processing_steps()))
                            }
                        }
                    }

                    div class="px-4 md:px-6 py-4 border-t border-gray-200 bg-white/80" {
                        div class="max-w-3xl mx-auto grid grid-cols-2 md:grid-cols-4 gap-2" {
                            @for action in QuickAction::ALL {
                                a href={ (base) "?quick=" (action.slug()) } class="p-3 bg-white border border-gray-200 rounded-xl text-left" {
                                    div class="text-sm font-medium" { (action.title()) }
                                    div class="text-xs text-gray-500" { (action.hint()) }
                                }
                            }
                        }
                    }

                    div class="border-t border-gray-200 bg-white p-4" {
                        form method="post" action={ (base) "/send" } class="max-w-3xl mx-auto relative" {
                            textarea name="message" rows="1" placeholder="Envoyez un message à AWAL GPT..." class="w-full p-4 pr-14 border border-gray-300 rounded-2xl resize-none" {
                                (prefill.unwrap_or(session.draft()))
                            }
                            button type="submit" class="absolute right-3 bottom-3 p-2 rounded-full bg-[#e10916] text-white" { "➤" }
                        }
                        div class="max-w-3xl mx-auto mt-3 text-xs text-gray-500" {
                            "AWAL Bot • Assistant IA Amazigh • " @if online { "Powered by DeepSeek API" } @else { "Mode local" }
                        }
                    }
                }
            }
        }
    )
}
